// ============================================================================
//  TYPES — Paylaşılan Tipler, Sabitler ve Yapılandırma
//  Lansman Planlayıcı v1.0
//
//  ✓ Tick domain sabitleri (int24 genişliği, MIN_TICK / MAX_TICK)
//  ✓ MiningParams / MiningResult: CREATE2 salt madenciliği girdisi/çıktısı
//  ✓ PlannerConfig: .env tabanlı yapılandırma
//  ✓ SlugReport: plot_slugs.py uyumlu JSON pozisyon raporu
// ============================================================================

use alloy::primitives::{Address, B256, U256};
use eyre::Result;
use serde::{Deserialize, Serialize};

use crate::create2::init_code_hash;
use crate::hook_flags;

// ─────────────────────────────────────────────────────────────────────────────
// Tick Domain Sabitleri
// ─────────────────────────────────────────────────────────────────────────────

/// Uniswap TickMath alt sınırı
pub const MIN_TICK: i32 = -887_272;

/// Uniswap TickMath üst sınırı
pub const MAX_TICK: i32 = 887_272;

/// int24 alt sınırı: ara hesapların taşma kontrolü için
pub const I24_MIN: i64 = -(1 << 23);

/// int24 üst sınırı
pub const I24_MAX: i64 = (1 << 23) - 1;

/// Uniswap'ın kabul ettiği en büyük tick spacing (exclusive değil, dahil)
pub const MAX_TICK_SPACING: i32 = 16_384;

/// Salt aramasının sert iterasyon tavanı
pub const MAX_LOOP: u64 = 100_000;

// ─────────────────────────────────────────────────────────────────────────────
// Tick Aralığı
// ─────────────────────────────────────────────────────────────────────────────

/// Spacing'e hizalı, sıralı tick çifti (tick_lower <= tick_upper)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickRange {
    pub tick_lower: i32,
    pub tick_upper: i32,
}

impl TickRange {
    pub fn new(tick_lower: i32, tick_upper: i32) -> Self {
        Self { tick_lower, tick_upper }
    }

    /// Aralık genişliği (tick cinsinden)
    pub fn width(&self) -> i32 {
        self.tick_upper - self.tick_lower
    }

    /// Aralık sıfır genişlikli mi? (clamp sonrası iki uç aynı sınıra yapışmış olabilir)
    pub fn is_empty(&self) -> bool {
        self.tick_lower == self.tick_upper
    }

    pub fn contains(&self, tick: i32) -> bool {
        tick >= self.tick_lower && tick < self.tick_upper
    }
}

impl std::fmt::Display for TickRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.tick_lower, self.tick_upper)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Salt Madenciliği Tipleri
// ─────────────────────────────────────────────────────────────────────────────

/// Madenci girdisi. Her lansman denemesi için taze oluşturulur, değiştirilmez.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningParams {
    /// Hook kontratını CREATE2 ile deploy edecek adres
    pub hook_deployer: Address,
    /// Asset token'ı CREATE2 ile deploy edecek adres
    pub token_deployer: Address,
    /// keccak256(hookCreationCode ++ abi.encode(args))
    pub hook_init_code_hash: B256,
    /// keccak256(tokenCreationCode ++ abi.encode(args))
    pub token_init_code_hash: B256,
    /// Referans (quote) token
    pub numeraire: Address,
    /// true → asset < numeraire olmalı (asset token0 olur)
    pub is_token0: bool,
    /// Hook adresinin düşük 14 bitinin birebir eşleşmesi gereken desen
    pub required_flags: u16,
}

/// Başarılı aramanın tek çıktısı
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MiningResult {
    pub salt: B256,
    pub hook_address: Address,
    pub asset_address: Address,
}

impl MiningResult {
    /// Salt'ın sayısal değeri (arama u64 aralığında kalır)
    pub fn salt_index(&self) -> u64 {
        U256::from_be_slice(self.salt.as_slice()).saturating_to::<u64>()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Slug Raporu (plot_slugs.py Uyumlu)
// ─────────────────────────────────────────────────────────────────────────────

/// Tek bir likidite pozisyonu ("slug"): görselleştirici satır formatı
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlugPosition {
    pub slug_name: String,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity: u128,
    pub current_tick: i32,
    pub timestamp: i64,
}

/// `{"data": [...]}`: görselleştirici stdin'den `Logs:` satırından sonra okur
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlugReport {
    pub data: Vec<SlugPosition>,
}

impl SlugReport {
    /// Tek satır JSON
    pub fn to_log_line(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| eyre::eyre!("slug raporu serileştirilemedi: {}", e))
    }

    /// Forge test çıktısı biçiminde blok: `Logs:` başlığı + girintili JSON satırı
    pub fn to_logs_block(&self) -> Result<String> {
        Ok(format!("Logs:\n  {}\n", self.to_log_line()?))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Güncel Fiyat Kaynağı
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceSource {
    /// Doğrudan verilen tick
    Tick(i32),
    /// sqrtPriceX96 okuması (tick'e kesin dönüşüm yapılır)
    SqrtPriceX96(U256),
    /// Canlı Uniswap V3 havuzu: slot0() RPC ile okunur
    Pool(Address),
}

impl std::fmt::Display for PriceSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PriceSource::Tick(t) => write!(f, "Sabit tick ({})", t),
            PriceSource::SqrtPriceX96(p) => write!(f, "sqrtPriceX96 ({})", p),
            PriceSource::Pool(a) => write!(f, "Canlı havuz slot0 ({})", a),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Planlayıcı Yapılandırması (.env tabanlı)
// ─────────────────────────────────────────────────────────────────────────────

/// Base Network WETH: varsayılan numeraire
pub const DEFAULT_NUMERAIRE: &str = "0x4200000000000000000000000000000000000006";

pub struct PlannerConfig {
    /// Hook CREATE2 deployer adresi
    pub hook_deployer: Address,
    /// Asset token CREATE2 deployer adresi
    pub token_deployer: Address,
    /// Numeraire token (varsayılan: Base WETH)
    pub numeraire: Address,
    /// Asset token0 olmalı mı?
    pub is_token0: bool,
    pub hook_init_code_hash: B256,
    pub token_init_code_hash: B256,
    /// Hook adresinin düşük 14 bit deseni (varsayılan: lansman hook'u)
    pub required_flags: u16,
    /// Uniswap fee tier (100 / 500 / 3000 / 10000)
    pub fee_tier: u32,
    /// Güncel fiyat nereden okunacak
    pub price_source: PriceSource,
    /// Tek taraflı aralığın spacing cinsinden genişliği
    pub range_spacings: i32,
    /// Opsiyonel simetrik pozisyon (current ± N spacing)
    pub balanced_range_spacings: Option<i32>,
    /// Tek taraflı pozisyona konacak asset miktarı (ham birim)
    pub asset_amount: U256,
    /// Dengeli pozisyona konacak numeraire miktarı (ham birim)
    pub numeraire_amount: U256,
    /// HTTP RPC URL: tanımlıysa adres doluluk kontrolü canlı yapılır
    pub rpc_http_url: Option<String>,
    /// 1 = sıralı referans tarama, >1 = paralel en-düşük-salt tarama
    pub miner_threads: usize,
    /// Arama süre sınırı (saniye, 0 = sınırsız)
    pub mine_timeout_secs: u64,
    /// Slug raporu hedefi ("-" = stdout)
    pub slug_output: String,
}

impl PlannerConfig {
    /// .env / süreç ortamından yapılandırmayı oku
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Anahtar → değer fonksiyonundan yapılandırma oku (testlerde HashMap ile)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        // ── Deployer Adresleri ────────────────────────────────────
        let hook_deployer = parse_address(
            "HOOK_DEPLOYER",
            &get("HOOK_DEPLOYER")
                .ok_or_else(|| eyre::eyre!("HOOK_DEPLOYER .env dosyasında tanımlanmalıdır!"))?,
        )?;

        let token_deployer = parse_address(
            "TOKEN_DEPLOYER",
            &get("TOKEN_DEPLOYER")
                .ok_or_else(|| eyre::eyre!("TOKEN_DEPLOYER .env dosyasında tanımlanmalıdır!"))?,
        )?;

        let numeraire = parse_address(
            "NUMERAIRE_ADDRESS",
            &get("NUMERAIRE_ADDRESS").unwrap_or_else(|| DEFAULT_NUMERAIRE.into()),
        )?;

        let is_token0 = match get("IS_TOKEN0") {
            Some(raw) => raw
                .trim()
                .to_lowercase()
                .parse::<bool>()
                .map_err(|_| eyre::eyre!("IS_TOKEN0 geçersiz: {:?} (true/false olmalı)", raw))?,
            None => true,
        };

        // ── Init Code Hash'leri ───────────────────────────────────
        // Öncelik: doğrudan hash → creation code + constructor args
        let hook_init_code_hash = resolve_init_code_hash(&get, "HOOK")?;
        let token_init_code_hash = resolve_init_code_hash(&get, "TOKEN")?;

        let required_flags = match get("REQUIRED_HOOK_FLAGS") {
            Some(raw) => parse_flags(&raw)?,
            None => hook_flags::LAUNCH_HOOK_FLAGS,
        };

        // ── Havuz / Aralık Ayarları ───────────────────────────────
        let fee_tier = get("FEE_TIER")
            .unwrap_or_else(|| "3000".into())
            .parse::<u32>()
            .unwrap_or(3000);

        let price_source = if let Some(raw) = get("CURRENT_TICK") {
            PriceSource::Tick(
                raw.trim()
                    .parse::<i32>()
                    .map_err(|e| eyre::eyre!("CURRENT_TICK geçersiz: {}", e))?,
            )
        } else if let Some(raw) = get("SQRT_PRICE_X96") {
            PriceSource::SqrtPriceX96(
                raw.trim()
                    .parse::<U256>()
                    .map_err(|e| eyre::eyre!("SQRT_PRICE_X96 geçersiz: {}", e))?,
            )
        } else if let Some(raw) = get("POOL_ADDRESS") {
            PriceSource::Pool(parse_address("POOL_ADDRESS", &raw)?)
        } else {
            PriceSource::Tick(0)
        };

        let range_spacings = get("RANGE_SPACINGS")
            .unwrap_or_else(|| "10".into())
            .parse::<i32>()
            .unwrap_or(10);

        let balanced_range_spacings = get("BALANCED_RANGE_SPACINGS")
            .and_then(|v| v.trim().parse::<i32>().ok());

        let asset_amount = parse_amount(get("ASSET_AMOUNT"));
        let numeraire_amount = parse_amount(get("NUMERAIRE_AMOUNT"));

        // ── RPC ve Madenci Ayarları ───────────────────────────────
        let rpc_http_url = get("RPC_HTTP_URL")
            .filter(|url| !url.starts_with("https://your-"));

        let miner_threads = get("MINER_THREADS")
            .unwrap_or_else(|| "1".into())
            .parse::<usize>()
            .unwrap_or(1)
            .max(1);

        let mine_timeout_secs = get("MINE_TIMEOUT_SECS")
            .unwrap_or_else(|| "0".into())
            .parse::<u64>()
            .unwrap_or(0);

        let slug_output = get("SLUG_OUTPUT").unwrap_or_else(|| "-".into());

        Ok(Self {
            hook_deployer,
            token_deployer,
            numeraire,
            is_token0,
            hook_init_code_hash,
            token_init_code_hash,
            required_flags,
            fee_tier,
            price_source,
            range_spacings,
            balanced_range_spacings,
            asset_amount,
            numeraire_amount,
            rpc_http_url,
            miner_threads,
            mine_timeout_secs,
            slug_output,
        })
    }

    /// Madenci girdisini yapılandırmadan üret
    pub fn mining_params(&self) -> MiningParams {
        MiningParams {
            hook_deployer: self.hook_deployer,
            token_deployer: self.token_deployer,
            hook_init_code_hash: self.hook_init_code_hash,
            token_init_code_hash: self.token_init_code_hash,
            numeraire: self.numeraire,
            is_token0: self.is_token0,
            required_flags: self.required_flags,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Ayrıştırma Yardımcıları
// ─────────────────────────────────────────────────────────────────────────────

fn parse_address(key: &str, raw: &str) -> Result<Address> {
    raw.trim()
        .parse::<Address>()
        .map_err(|e| eyre::eyre!("{} geçersiz adres: {}", key, e))
}

fn parse_hex(key: &str, raw: &str) -> Result<Vec<u8>> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    hex::decode(digits).map_err(|e| eyre::eyre!("{} geçersiz hex: {}", key, e))
}

/// `{PREFIX}_INIT_CODE_HASH` ya da `{PREFIX}_CREATION_CODE` (+ `{PREFIX}_CONSTRUCTOR_ARGS`)
fn resolve_init_code_hash<G>(get: &G, prefix: &str) -> Result<B256>
where
    G: Fn(&str) -> Option<String>,
{
    let hash_key = format!("{}_INIT_CODE_HASH", prefix);
    if let Some(raw) = get(&hash_key) {
        let bytes = parse_hex(&hash_key, &raw)?;
        if bytes.len() != 32 {
            return Err(eyre::eyre!(
                "{} 32 byte olmalıdır (okunan: {} byte)",
                hash_key,
                bytes.len()
            ));
        }
        return Ok(B256::from_slice(&bytes));
    }

    let code_key = format!("{}_CREATION_CODE", prefix);
    let args_key = format!("{}_CONSTRUCTOR_ARGS", prefix);
    let code = get(&code_key).ok_or_else(|| {
        eyre::eyre!("{} veya {} .env dosyasında tanımlanmalıdır!", hash_key, code_key)
    })?;
    let creation_code = parse_hex(&code_key, &code)?;
    let constructor_args = match get(&args_key) {
        Some(raw) => parse_hex(&args_key, &raw)?,
        None => Vec::new(),
    };

    Ok(init_code_hash(&creation_code, &constructor_args))
}

/// Ondalık ya da 0x-hex bayrak deseni
fn parse_flags(raw: &str) -> Result<u16> {
    let trimmed = raw.trim();
    let parsed = match trimmed.strip_prefix("0x") {
        Some(digits) => u16::from_str_radix(digits, 16),
        None => trimmed.parse::<u16>(),
    };
    parsed.map_err(|e| eyre::eyre!("REQUIRED_HOOK_FLAGS geçersiz: {}", e))
}

fn parse_amount(raw: Option<String>) -> U256 {
    raw.and_then(|v| v.trim().parse::<U256>().ok())
        .unwrap_or(U256::ZERO)
}

// ─────────────────────────────────────────────────────────────────────────────
// Testler
// ─────────────────────────────────────────────────────────────────────────────
