// ============================================================================
//  STATE_SYNC — Canlı Zincir Okumaları (Alloy HTTP Provider)
//
//  ✓ RpcOccupancy: eth_getCode ile hook adresi doluluk kontrolü
//    (madenci senkron çağırır → tokio Handle üzerinden köprü)
//  ✓ Uniswap V3 slot0 okuma → güncel tick + sqrtPriceX96
//
//  Sadece OKUMA yapılır; işlem imzalanmaz veya gönderilmez.
// ============================================================================

use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, Bytes, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::sol;
use eyre::Result;
use tokio::runtime::Handle;

use crate::miner::OccupancyOracle;

// ─────────────────────────────────────────────────────────────────────────────
// Uniswap V3 Havuz Arayüzü (slot0 → 7 değişken, feeProtocol DAHİL)
// ─────────────────────────────────────────────────────────────────────────────

sol! {
    #[sol(rpc)]
    interface IUniswapV3Pool {
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );

        function fee() external view returns (uint24);
    }
}

/// slot0'dan planlayıcının ihtiyaç duyduğu kısım
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolPrice {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub fee: u32,
}

// ─────────────────────────────────────────────────────────────────────────────
// Provider Kurulumu
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP RPC provider'ı oluştur (tip silinmiş: planlayıcı tek tip taşır)
pub fn connect_http(rpc_url: &str) -> Result<DynProvider> {
    let url = rpc_url
        .parse()
        .map_err(|e| eyre::eyre!("RPC_HTTP_URL geçersiz ({}): {}", rpc_url, e))?;
    Ok(ProviderBuilder::new().connect_http(url).erased())
}

/// Havuzun güncel fiyatını oku
pub async fn read_pool_price<P: Provider>(provider: &P, pool: Address) -> Result<PoolPrice> {
    let contract = IUniswapV3Pool::new(pool, provider);
    let slot0 = contract
        .slot0()
        .call()
        .await
        .map_err(|e| eyre::eyre!("[{}] slot0 okuma hatası: {}", pool, e))?;
    let fee = contract
        .fee()
        .call()
        .await
        .map_err(|e| eyre::eyre!("[{}] fee okuma hatası: {}", pool, e))?;

    Ok(PoolPrice {
        sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
        tick: slot0.tick.as_i32(),
        fee: fee.to::<u32>(),
    })
}

// ─────────────────────────────────────────────────────────────────────────────
// RPC Tabanlı Doluluk Oracle'ı
// ─────────────────────────────────────────────────────────────────────────────

/// eth_getCode ile "adreste kod var mı?" kontrolü.
///
/// Her sorgu zincire gider (önbellek yok); madenci yalnızca bayrakları
/// eşleşen adaylar için sorar. RPC hatası → adres DOLU sayılır, böylece
/// emin olunamayan bir salt asla döndürülmez.
pub struct RpcOccupancy<P> {
    provider: P,
    handle: Handle,
    queries: AtomicU64,
    failures: AtomicU64,
}

impl<P: Provider> RpcOccupancy<P> {
    pub fn new(provider: P, handle: Handle) -> Self {
        Self {
            provider,
            handle,
            queries: AtomicU64::new(0),
            failures: AtomicU64::new(0),
        }
    }

    /// Adresteki runtime bytecode
    pub async fn code_at(&self, address: Address) -> Result<Bytes> {
        self.provider
            .get_code_at(address)
            .await
            .map_err(|e| eyre::eyre!("[{}] bytecode okuma hatası: {}", address, e))
    }

    /// Şimdiye kadar yapılan eth_getCode sorgu sayısı
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }

    /// Başarısız sorgu sayısı (dolu sayılanlar)
    pub fn failure_count(&self) -> u64 {
        self.failures.load(Ordering::Relaxed)
    }
}

impl<P: Provider> OccupancyOracle for RpcOccupancy<P> {
    fn is_occupied(&self, address: Address) -> bool {
        self.queries.fetch_add(1, Ordering::Relaxed);

        // Madenci senkron; worker thread'i runtime'ı bloke etmeden bekler
        let code = tokio::task::block_in_place(|| self.handle.block_on(self.code_at(address)));

        match code {
            Ok(code) => !code.is_empty(),
            Err(e) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
                eprintln!("  ⚠️ Doluluk kontrolü başarısız, adres dolu sayıldı: {}", e);
                true
            }
        }
    }
}
