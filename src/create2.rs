// ============================================================================
//  CREATE2 — Deterministik Kontrat Adresi Türetimi
//
//  address = keccak256(0xff ++ deployer ++ salt ++ initCodeHash)[12..32]
//
//  Init code hash'i salt'tan bağımsızdır: madenci döngüsü dışında BİR KEZ
//  hesaplanır, sonra 100K adayın her birinde yalnızca 85 byte'lık ön-görüntü
//  hash'lenir.
// ============================================================================

use alloy::primitives::{keccak256, Address, Bytes, B256};
use alloy::sol_types::abi::TokenSeq;
use alloy::sol_types::{SolType, SolValue};

/// CREATE2 ön-görüntü uzunluğu: 1 + 20 + 32 + 32
const CREATE2_PREIMAGE_LEN: usize = 85;

/// CREATE2 ön eki (EIP-1014)
const CREATE2_PREFIX: u8 = 0xff;

/// Standart CREATE2 adres formülü: EVM ile bit bit aynı.
#[inline]
pub fn create2_address(deployer: Address, salt: B256, init_code_hash: B256) -> Address {
    let mut preimage = [0u8; CREATE2_PREIMAGE_LEN];
    preimage[0] = CREATE2_PREFIX;
    preimage[1..21].copy_from_slice(deployer.as_slice());
    preimage[21..53].copy_from_slice(salt.as_slice());
    preimage[53..85].copy_from_slice(init_code_hash.as_slice());

    let digest = keccak256(preimage);
    Address::from_slice(&digest[12..])
}

/// keccak256(creationCode ++ encodedConstructorArgs)
pub fn init_code_hash(creation_code: &[u8], encoded_args: &[u8]) -> B256 {
    let mut init_code = Vec::with_capacity(creation_code.len() + encoded_args.len());
    init_code.extend_from_slice(creation_code);
    init_code.extend_from_slice(encoded_args);
    keccak256(&init_code)
}

// ─────────────────────────────────────────────────────────────────────────────
// Init Code: Creation Bytecode + ABI Kodlanmış Constructor Argümanları
// ─────────────────────────────────────────────────────────────────────────────

/// Deploy edilecek kontratın tam init code'u
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InitCode {
    pub creation_code: Bytes,
    pub constructor_args: Bytes,
}

impl InitCode {
    /// Ham creation code + önceden kodlanmış argümanlar
    pub fn new(creation_code: impl Into<Bytes>, constructor_args: impl Into<Bytes>) -> Self {
        Self {
            creation_code: creation_code.into(),
            constructor_args: constructor_args.into(),
        }
    }

    /// Argümanları `abi.encode(args...)` ile kodla (tuple → parametre listesi)
    pub fn with_args<T>(creation_code: impl Into<Bytes>, args: &T) -> Self
    where
        T: SolValue,
        for<'a> <T::SolType as SolType>::Token<'a>: TokenSeq<'a>,
    {
        Self {
            creation_code: creation_code.into(),
            constructor_args: Bytes::from(args.abi_encode_params()),
        }
    }

    pub fn hash(&self) -> B256 {
        init_code_hash(&self.creation_code, &self.constructor_args)
    }

    /// Bu init code'un verilen deployer + salt ile ineceği adres
    pub fn address(&self, deployer: Address, salt: B256) -> Address {
        create2_address(deployer, salt, self.hash())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Testler
// ─────────────────────────────────────────────────────────────────────────────
