// ============================================================================
//  MINER — Deterministik CREATE2 Salt Madenciliği
//
//  Hook ve asset token AYNI salt ile deploy edilir. Aranan: [0, MAX_LOOP)
//  içinde, artan sırada şu üç koşulu sağlayan İLK salt:
//
//    1. hook adresinin düşük 14 biti == required_flags   (birebir)
//    2. hook adresinde henüz kod yok                     (oracle)
//    3. is_token0 ? asset < numeraire : asset > numeraire
//
//  Kontrol sırası sabittir: bayrak eşleşmeyen adaylarda oracle hiç çağrılmaz
//  ve asset adresi hiç hesaplanmaz.
//
//  Varyantlar:
//    mine_deployment_salt              → referans sıralı tarama
//    mine_deployment_salt_with_cancel  → her adayda CancellationToken kontrolü
//    mine_deployment_salt_parallel     → N worker, iç içe geçmiş salt'lar,
//                                        global EN KÜÇÜK eşleşme kazanır
// ============================================================================

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use alloy::primitives::{Address, B256, U256};
use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;

use crate::create2::create2_address;
use crate::errors::{PlanError, PlanResult};
use crate::hook_flags;
use crate::types::{MiningParams, MiningResult, MAX_LOOP};

// ─────────────────────────────────────────────────────────────────────────────
// Doluluk Oracle'ı
// ─────────────────────────────────────────────────────────────────────────────

/// "Bu adreste zaten kod var mı?" sorusunun cevabı.
///
/// Her çağrıda taze cevap verilmeli; madenci sonuçları önbelleğe almaz.
pub trait OccupancyOracle {
    fn is_occupied(&self, address: Address) -> bool;
}

impl<F> OccupancyOracle for F
where
    F: Fn(Address) -> bool,
{
    #[inline]
    fn is_occupied(&self, address: Address) -> bool {
        self(address)
    }
}

/// Boş zincir: hiçbir adres dolu değil (offline çalışma)
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverOccupied;

impl OccupancyOracle for NeverOccupied {
    #[inline]
    fn is_occupied(&self, _address: Address) -> bool {
        false
    }
}

/// Bellekteki bilinen dolu adres kümesi
#[derive(Debug, Clone, Default)]
pub struct KnownOccupancy {
    occupied: HashSet<Address>,
}

impl KnownOccupancy {
    pub fn new(addresses: impl IntoIterator<Item = Address>) -> Self {
        Self { occupied: addresses.into_iter().collect() }
    }

    pub fn insert(&mut self, address: Address) -> bool {
        self.occupied.insert(address)
    }

    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }
}

impl OccupancyOracle for KnownOccupancy {
    #[inline]
    fn is_occupied(&self, address: Address) -> bool {
        self.occupied.contains(&address)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tek Aday Değerlendirmesi
// ─────────────────────────────────────────────────────────────────────────────

/// Salt değeri: 32 byte big-endian tamsayı
#[inline]
pub fn salt_from_index(index: u64) -> B256 {
    B256::from(U256::from(index))
}

#[inline]
fn asset_is_ordered(asset: Address, numeraire: Address, is_token0: bool) -> bool {
    if is_token0 {
        asset < numeraire
    } else {
        asset > numeraire
    }
}

/// Bir salt'ı üç koşula karşı sınar; hepsi sağlanırsa sonucu döndürür
#[inline]
fn evaluate_candidate<O>(params: &MiningParams, oracle: &O, index: u64) -> Option<MiningResult>
where
    O: OccupancyOracle + ?Sized,
{
    let salt = salt_from_index(index);
    let hook_address = create2_address(params.hook_deployer, salt, params.hook_init_code_hash);

    if !hook_flags::matches_exactly(hook_address, params.required_flags) {
        return None;
    }
    if oracle.is_occupied(hook_address) {
        return None;
    }

    let asset_address = create2_address(params.token_deployer, salt, params.token_init_code_hash);
    if !asset_is_ordered(asset_address, params.numeraire, params.is_token0) {
        return None;
    }

    Some(MiningResult { salt, hook_address, asset_address })
}

// ─────────────────────────────────────────────────────────────────────────────
// Sıralı Tarama
// ─────────────────────────────────────────────────────────────────────────────

/// Referans tarama: salt 0, 1, 2, … MAX_LOOP-1: ilk eşleşme kazanır.
///
/// Aynı params + aynı oracle cevapları → her zaman aynı salt.
pub fn mine_deployment_salt<O>(params: &MiningParams, oracle: &O) -> PlanResult<MiningResult>
where
    O: OccupancyOracle + ?Sized,
{
    (0..MAX_LOOP)
        .find_map(|index| evaluate_candidate(params, oracle, index))
        .ok_or(PlanError::SaltSearchExhausted { iterations: MAX_LOOP })
}

/// Sıralı tarama + iptal: token her adaydan ÖNCE kontrol edilir.
/// İptal anına kadar denenen aday sayısı hatada raporlanır.
pub fn mine_deployment_salt_with_cancel<O>(
    params: &MiningParams,
    oracle: &O,
    cancel: &CancellationToken,
) -> PlanResult<MiningResult>
where
    O: OccupancyOracle + ?Sized,
{
    for index in 0..MAX_LOOP {
        if cancel.is_cancelled() {
            return Err(PlanError::MiningCancelled { iterations: index });
        }
        if let Some(result) = evaluate_candidate(params, oracle, index) {
            return Ok(result);
        }
    }
    Err(PlanError::SaltSearchExhausted { iterations: MAX_LOOP })
}

// ─────────────────────────────────────────────────────────────────────────────
// Paralel Tarama
// ─────────────────────────────────────────────────────────────────────────────

/// `threads` worker ile tarama. Worker `w` şu salt'ları dener:
/// w, w + threads, w + 2·threads, …
///
/// `best` şimdiye kadar bulunan en küçük eşleşen salt'ı tutar. Bir worker,
/// sıradaki salt'ı `best`'ten büyük-eşitse durur: o noktadan sonraki hiçbir
/// aday kazanamaz. `best`'ten küçük tüm salt'lar bir worker tarafından
/// mutlaka denendiği için sonuç sıralı taramayla AYNIDIR.
///
/// İptalde her worker denemediği ilk salt'ı `frontier`'a yazar. Kazanan
/// ancak tüm frontier'ların altındaysa döndürülür (altındaki her salt
/// denenmiştir); aksi halde `MiningCancelled`.
///
/// Oracle, nihai kazanandan büyük salt'lar için de sorgulanabilir.
pub fn mine_deployment_salt_parallel<O>(
    params: &MiningParams,
    oracle: &O,
    threads: usize,
    cancel: &CancellationToken,
) -> PlanResult<MiningResult>
where
    O: OccupancyOracle + Sync + ?Sized,
{
    let threads = threads.max(1) as u64;
    let best = AtomicU64::new(u64::MAX);
    let frontier = AtomicU64::new(u64::MAX);
    let winner: Mutex<Option<MiningResult>> = Mutex::new(None);
    let attempts = AtomicU64::new(0);

    std::thread::scope(|scope| {
        for worker in 0..threads {
            let best = &best;
            let frontier = &frontier;
            let winner = &winner;
            let attempts = &attempts;
            scope.spawn(move || {
                let mut index = worker;
                while index < MAX_LOOP {
                    if index >= best.load(Ordering::Acquire) {
                        break;
                    }
                    if cancel.is_cancelled() {
                        frontier.fetch_min(index, Ordering::AcqRel);
                        break;
                    }
                    attempts.fetch_add(1, Ordering::Relaxed);
                    if let Some(result) = evaluate_candidate(params, oracle, index) {
                        best.fetch_min(index, Ordering::AcqRel);
                        let mut slot = winner.lock();
                        let replace = slot
                            .as_ref()
                            .map_or(true, |current| index < current.salt_index());
                        if replace {
                            *slot = Some(result);
                        }
                        break;
                    }
                    index += threads;
                }
            });
        }
    });

    let frontier = frontier.into_inner();
    match winner.into_inner() {
        Some(result) if result.salt_index() < frontier => Ok(result),
        _ if frontier != u64::MAX => Err(PlanError::MiningCancelled {
            iterations: attempts.into_inner(),
        }),
        _ => Err(PlanError::SaltSearchExhausted { iterations: MAX_LOOP }),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Testler
// ─────────────────────────────────────────────────────────────────────────────
