// ============================================================================
//  HOOK FLAGS — Uniswap V4 Hook İzin Bitleri
//
//  V4 PoolManager, bir hook'un hangi callback'leri çağıracağını hook
//  adresinin DÜŞÜK 14 BİTİNDEN okur. Bu yüzden hook adresi, istenen bit
//  desenini birebir taşıyacak şekilde CREATE2 salt'ı ile "madenlenir".
//
//    bit 13  beforeInitialize              bit 6  afterSwap
//    bit 12  afterInitialize               bit 5  beforeDonate
//    bit 11  beforeAddLiquidity            bit 4  afterDonate
//    bit 10  afterAddLiquidity             bit 3  beforeSwapReturnDelta
//    bit  9  beforeRemoveLiquidity         bit 2  afterSwapReturnDelta
//    bit  8  afterRemoveLiquidity          bit 1  afterAddLiquidityReturnDelta
//    bit  7  beforeSwap                    bit 0  afterRemoveLiquidityReturnDelta
// ============================================================================

use alloy::primitives::Address;

pub const BEFORE_INITIALIZE: u16 = 1 << 13;
pub const AFTER_INITIALIZE: u16 = 1 << 12;
pub const BEFORE_ADD_LIQUIDITY: u16 = 1 << 11;
pub const AFTER_ADD_LIQUIDITY: u16 = 1 << 10;
pub const BEFORE_REMOVE_LIQUIDITY: u16 = 1 << 9;
pub const AFTER_REMOVE_LIQUIDITY: u16 = 1 << 8;
pub const BEFORE_SWAP: u16 = 1 << 7;
pub const AFTER_SWAP: u16 = 1 << 6;
pub const BEFORE_DONATE: u16 = 1 << 5;
pub const AFTER_DONATE: u16 = 1 << 4;
pub const BEFORE_SWAP_RETURNS_DELTA: u16 = 1 << 3;
pub const AFTER_SWAP_RETURNS_DELTA: u16 = 1 << 2;
pub const AFTER_ADD_LIQUIDITY_RETURNS_DELTA: u16 = 1 << 1;
pub const AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA: u16 = 1 << 0;

/// Düşük 14 bit: tüm izin bitleri
pub const ALL_HOOK_MASK: u16 = (1 << 14) - 1;

/// Lansman (likidite keşif) hook'unun kullandığı callback seti
pub const LAUNCH_HOOK_FLAGS: u16 = BEFORE_INITIALIZE
    | AFTER_INITIALIZE
    | BEFORE_ADD_LIQUIDITY
    | BEFORE_SWAP
    | AFTER_SWAP
    | BEFORE_DONATE;

/// Adresin düşük 14 biti
#[inline]
pub fn flags_of(address: Address) -> u16 {
    u16::from_be_bytes([address[18], address[19]]) & ALL_HOOK_MASK
}

/// Düşük 14 bit `required` ile BİREBİR aynı mı? (fazla bit de reddedilir)
#[inline]
pub fn matches_exactly(address: Address, required: u16) -> bool {
    flags_of(address) == required
}

/// `flags` içindeki bitlerin hepsi açık mı?
#[inline]
pub fn has_permissions(address: Address, flags: u16) -> bool {
    flags_of(address) & flags == flags
}

/// `flags` içinden en az bir bit açık mı?
#[inline]
pub fn has_any_permission(address: Address, flags: u16) -> bool {
    flags_of(address) & flags != 0
}

/// İnsan okunur bayrak listesi (log çıktısı için)
pub fn describe(flags: u16) -> Vec<&'static str> {
    const NAMES: [(u16, &str); 14] = [
        (BEFORE_INITIALIZE, "beforeInitialize"),
        (AFTER_INITIALIZE, "afterInitialize"),
        (BEFORE_ADD_LIQUIDITY, "beforeAddLiquidity"),
        (AFTER_ADD_LIQUIDITY, "afterAddLiquidity"),
        (BEFORE_REMOVE_LIQUIDITY, "beforeRemoveLiquidity"),
        (AFTER_REMOVE_LIQUIDITY, "afterRemoveLiquidity"),
        (BEFORE_SWAP, "beforeSwap"),
        (AFTER_SWAP, "afterSwap"),
        (BEFORE_DONATE, "beforeDonate"),
        (AFTER_DONATE, "afterDonate"),
        (BEFORE_SWAP_RETURNS_DELTA, "beforeSwapReturnDelta"),
        (AFTER_SWAP_RETURNS_DELTA, "afterSwapReturnDelta"),
        (AFTER_ADD_LIQUIDITY_RETURNS_DELTA, "afterAddLiquidityReturnDelta"),
        (AFTER_REMOVE_LIQUIDITY_RETURNS_DELTA, "afterRemoveLiquidityReturnDelta"),
    ];
    NAMES
        .iter()
        .filter(|(bit, _)| flags & bit != 0)
        .map(|(_, name)| *name)
        .collect()
}
