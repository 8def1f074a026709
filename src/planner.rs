// ============================================================================
//  PLANNER — Lansman Planı Orkestratörü
//
//  Akış:
//    1. Güncel fiyat → tick   (sabit tick / sqrtPriceX96 / canlı slot0)
//    2. Fee tier → tick spacing
//    3. Salt madenciliği      (sıralı veya paralel, opsiyonel süre sınırı)
//    4. Pozisyonlar           (tek taraflı asset aralığı + opsiyonel dengeli)
//    5. Likidite boyutlama    (kesin Q64.96 matematiği)
//
//  Tek taraflı pozisyon asset'in tarafında durur: asset token0 ise aralık
//  fiyatın üstünde (sadece asset gerekir), token1 ise fiyatın altında.
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use alloy::primitives::U256;
use alloy::providers::DynProvider;
use eyre::Result;
use tokio::runtime::Handle;
use tokio_util::sync::CancellationToken;

use crate::errors::PlanResult;
use crate::math::{self, exact};
use crate::miner::{
    mine_deployment_salt_parallel, mine_deployment_salt_with_cancel, NeverOccupied,
    OccupancyOracle,
};
use crate::state_sync::{self, RpcOccupancy};
use crate::types::{
    MiningParams, MiningResult, PlannerConfig, PriceSource, SlugPosition, SlugReport, TickRange,
};

pub const SINGLE_SIDED_SLUG: &str = "singleSided";
pub const BALANCED_SLUG: &str = "balanced";

// ─────────────────────────────────────────────────────────────────────────────
// Plan Tipleri
// ─────────────────────────────────────────────────────────────────────────────

/// Bir likidite pozisyonu: aralık + o aralığa sığan likidite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedPosition {
    pub slug_name: &'static str,
    pub range: TickRange,
    pub liquidity: u128,
}

/// Çözümlenmiş güncel fiyat
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentPrice {
    pub tick: i32,
    pub sqrt_price_x96: U256,
    /// Canlı havuzdan okunan fee (varsa yapılandırmadakini ezer)
    pub pool_fee: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct LaunchPlan {
    pub fee_tier: u32,
    pub tick_spacing: i32,
    pub price: CurrentPrice,
    pub mining: MiningResult,
    pub positions: Vec<PlannedPosition>,
    /// Canlı doluluk kontrolünde yapılan eth_getCode sayısı (offline: None)
    pub oracle_queries: Option<u64>,
    pub mining_elapsed: Duration,
    pub timestamp: i64,
}

impl LaunchPlan {
    /// Görselleştirici formatında slug raporu
    pub fn slug_report(&self) -> SlugReport {
        SlugReport {
            data: self
                .positions
                .iter()
                .map(|p| SlugPosition {
                    slug_name: p.slug_name.to_string(),
                    tick_lower: p.range.tick_lower,
                    tick_upper: p.range.tick_upper,
                    liquidity: p.liquidity,
                    current_tick: self.price.tick,
                    timestamp: self.timestamp,
                })
                .collect(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Fiyat Çözümleme
// ─────────────────────────────────────────────────────────────────────────────

pub async fn resolve_price(
    source: PriceSource,
    provider: Option<&DynProvider>,
) -> Result<CurrentPrice> {
    match source {
        PriceSource::Tick(tick) => Ok(CurrentPrice {
            tick,
            sqrt_price_x96: exact::get_sqrt_ratio_at_tick(tick)?,
            pool_fee: None,
        }),
        PriceSource::SqrtPriceX96(sqrt_price_x96) => Ok(CurrentPrice {
            tick: exact::get_tick_at_sqrt_ratio(sqrt_price_x96)?,
            sqrt_price_x96,
            pool_fee: None,
        }),
        PriceSource::Pool(pool) => {
            let provider = provider.ok_or_else(|| {
                eyre::eyre!("POOL_ADDRESS için RPC_HTTP_URL tanımlanmalıdır!")
            })?;
            let live = state_sync::read_pool_price(provider, pool).await?;
            Ok(CurrentPrice {
                tick: live.tick,
                sqrt_price_x96: live.sqrt_price_x96,
                pool_fee: Some(live.fee),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Madencilik
// ─────────────────────────────────────────────────────────────────────────────

/// threads == 1 → sıralı referans tarama, aksi halde paralel tarama
pub fn mine_salt<O>(
    params: &MiningParams,
    oracle: &O,
    threads: usize,
    cancel: &CancellationToken,
) -> PlanResult<MiningResult>
where
    O: OccupancyOracle + Sync + ?Sized,
{
    if threads <= 1 {
        mine_deployment_salt_with_cancel(params, oracle, cancel)
    } else {
        mine_deployment_salt_parallel(params, oracle, threads, cancel)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pozisyon Planlama
// ─────────────────────────────────────────────────────────────────────────────

/// Aralıkları hesapla ve her birini yapılandırılmış miktarlarla boyutla
pub fn plan_positions(
    config: &PlannerConfig,
    tick_spacing: i32,
    price: &CurrentPrice,
) -> PlanResult<Vec<PlannedPosition>> {
    let mut positions = Vec::with_capacity(2);

    let single = math::calculate_single_sided_range(
        price.tick,
        tick_spacing,
        config.is_token0,
        config.range_spacings,
    )?;
    let (sqrt_lower, sqrt_upper) = range_sqrt_bounds(&single)?;
    let liquidity = if config.is_token0 {
        exact::liquidity_for_amount0(sqrt_lower, sqrt_upper, config.asset_amount)?
    } else {
        exact::liquidity_for_amount1(sqrt_lower, sqrt_upper, config.asset_amount)?
    };
    positions.push(PlannedPosition {
        slug_name: SINGLE_SIDED_SLUG,
        range: single,
        liquidity,
    });

    if let Some(range_spacings) = config.balanced_range_spacings {
        let balanced = math::calculate_balanced_range(price.tick, tick_spacing, range_spacings)?;
        let (sqrt_lower, sqrt_upper) = range_sqrt_bounds(&balanced)?;
        let (amount0, amount1) = if config.is_token0 {
            (config.asset_amount, config.numeraire_amount)
        } else {
            (config.numeraire_amount, config.asset_amount)
        };
        let liquidity = exact::liquidity_for_amounts(
            price.sqrt_price_x96,
            sqrt_lower,
            sqrt_upper,
            amount0,
            amount1,
        )?;
        positions.push(PlannedPosition {
            slug_name: BALANCED_SLUG,
            range: balanced,
            liquidity,
        });
    }

    Ok(positions)
}

fn range_sqrt_bounds(range: &TickRange) -> PlanResult<(U256, U256)> {
    Ok((
        exact::get_sqrt_ratio_at_tick(range.tick_lower)?,
        exact::get_sqrt_ratio_at_tick(range.tick_upper)?,
    ))
}

// ─────────────────────────────────────────────────────────────────────────────
// Ana Akış
// ─────────────────────────────────────────────────────────────────────────────

/// Yapılandırmadan tam lansman planı üret
pub async fn build_launch_plan(config: &PlannerConfig) -> Result<LaunchPlan> {
    let provider = config
        .rpc_http_url
        .as_deref()
        .map(state_sync::connect_http)
        .transpose()?;

    // ── 1-2. Fiyat + spacing ─────────────────────────────────
    let price = resolve_price(config.price_source, provider.as_ref()).await?;
    let fee_tier = price.pool_fee.unwrap_or(config.fee_tier);
    let tick_spacing = math::tick_spacing_for_fee(fee_tier)?;

    // ── 3. Salt madenciliği ──────────────────────────────────
    let rpc_oracle = provider
        .map(|p| Arc::new(RpcOccupancy::new(p, Handle::current())));
    let oracle: Arc<dyn OccupancyOracle + Send + Sync> = match &rpc_oracle {
        Some(rpc) => Arc::clone(rpc) as Arc<dyn OccupancyOracle + Send + Sync>,
        None => Arc::new(NeverOccupied),
    };

    let cancel = CancellationToken::new();
    let deadline = (config.mine_timeout_secs > 0).then(|| {
        let token = cancel.clone();
        let secs = config.mine_timeout_secs;
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(secs)).await;
            token.cancel();
        })
    });

    let params = config.mining_params();
    let threads = config.miner_threads;
    let mining_token = cancel.clone();
    let started = Instant::now();
    let mined = tokio::task::spawn_blocking(move || {
        mine_salt(&params, oracle.as_ref(), threads, &mining_token)
    })
    .await
    .map_err(|e| eyre::eyre!("madenci görevi çöktü: {}", e))?;
    let mining_elapsed = started.elapsed();

    if let Some(handle) = deadline {
        handle.abort();
    }
    let mining = mined?;

    // ── 4-5. Pozisyonlar ─────────────────────────────────────
    let positions = plan_positions(config, tick_spacing, &price)?;

    Ok(LaunchPlan {
        fee_tier,
        tick_spacing,
        price,
        mining,
        positions,
        oracle_queries: rpc_oracle.map(|rpc| rpc.query_count()),
        mining_elapsed,
        timestamp: chrono::Utc::now().timestamp(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// Testler
// ─────────────────────────────────────────────────────────────────────────────
