// ============================================================================
//  ERRORS — Kütüphane Hata Tipleri
//
//  Her hata çağırana kadar yükselir; kütüphane hiçbir hatayı yutmaz veya
//  tekrar denemez. Varyantlar, bir insanın ya da çağıran sistemin tepki
//  verebilmesi için gereken bağlamı (hangi fee, hangi işlem, kaç iterasyon)
//  taşır.
// ============================================================================

use thiserror::Error;

/// Planlayıcı kütüphanesinin tüm hata durumları
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    // ─── Tick Matematiği ─────────────────────────────────────────────────

    /// Fee tier → tick spacing tablosunda karşılığı olmayan fee
    #[error("desteklenmeyen fee tier: {fee} (geçerli: 100, 500, 3000, 10000)")]
    UnsupportedFeeTier { fee: u32 },

    /// Ara hesap int24 sınırlarını aştı (clamp'ten ÖNCE)
    #[error("aritmetik taşma: {operation} ({lhs}, {rhs}) int24 aralığını aşıyor")]
    ArithmeticOverflow {
        operation: &'static str,
        lhs: i64,
        rhs: i64,
    },

    #[error("geçersiz tick spacing: {spacing} (1..=16384 olmalı)")]
    InvalidTickSpacing { spacing: i32 },

    #[error("geçersiz aralık genişliği: {range_spacings} (negatif olamaz)")]
    InvalidRangeSpacings { range_spacings: i32 },

    #[error("tick aralık dışı: {tick} (MIN_TICK..=MAX_TICK)")]
    TickOutOfRange { tick: i32 },

    #[error("sqrtPriceX96 aralık dışı: {sqrt_price_x96}")]
    SqrtPriceOutOfRange { sqrt_price_x96: String },

    #[error("likidite u128 sınırını aşıyor")]
    LiquidityOverflow,

    // ─── Salt Madenciliği ────────────────────────────────────────────────

    /// [0, MAX_LOOP) aralığındaki hiçbir salt tüm koşulları sağlamadı
    #[error("salt araması tükendi: {iterations} aday denendi, eşleşme yok")]
    SaltSearchExhausted { iterations: u64 },

    /// Çağıranın iptal token'ı arama bitmeden tetiklendi
    #[error("salt araması iptal edildi ({iterations} aday denendikten sonra)")]
    MiningCancelled { iterations: u64 },
}

pub type PlanResult<T> = Result<T, PlanError>;
