//! Templated insight messages for emotional spending

use crate::emotions::{dominant, EmotionSummary};
use crate::models::Emotion;

/// Shown when there is nothing to summarize yet
pub const NO_DATA_MESSAGE: &str =
    "Belum ada data pengeluaran. Yuk mulai curhat soal pengeluaranmu!";

/// Shown on a monthly report for a month without transactions
pub const EMPTY_MONTH_MESSAGE: &str =
    "Belum ada transaksi bulan ini. Yuk mulai catat pengeluaranmu!";

/// Message for one dominant emotion and its share of spending
pub fn message_for(emotion: &Emotion, percentage: u32) -> String {
    match emotion {
        Emotion::Stressed => format!(
            "Wah, {}% pengeluaran lu karena stress. Coba cari aktivitas stress relief yang lebih murah ya!",
            percentage
        ),
        Emotion::Sad => format!(
            "Hmm, {}% keluar pas lagi sedih. Curhat sama temen kadang lebih healing lho daripada belanja.",
            percentage
        ),
        Emotion::Happy => format!(
            "Nice! {}% pengeluaran lu pas lagi senang. Boleh lah treat yourself, asal terkontrol~",
            percentage
        ),
        Emotion::Angry => format!(
            "Hmm, {}% keluar pas lagi kesel. Deep breath dulu sebelum checkout next time!",
            percentage
        ),
        Emotion::Hungry => format!(
            "Wkwk {}% buat makan. Wajar sih, siapa yang tahan sama lapar 😂",
            percentage
        ),
        Emotion::Neutral => format!(
            "{}% pengeluaran lu terencana dengan baik. Mantap!",
            percentage
        ),
        other => format!(
            "Emosi {} mendominasi {}% pengeluaran lu.",
            other.as_str(),
            percentage
        ),
    }
}

/// Narrate the top-ranked summary, or the "no data" message when empty
pub fn narrate(summaries: &[EmotionSummary]) -> String {
    match dominant(summaries) {
        Some(top) => message_for(&top.emotion, top.percentage),
        None => NO_DATA_MESSAGE.to_string(),
    }
}
