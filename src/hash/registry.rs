//! Supported-algorithm registry
//!
//! Fixed mapping from algorithm name to a zero-argument hasher factory.
//! The pipeline only talks to the registry by name; the concrete
//! algorithm crates stay behind [`Hasher`].

use super::Hasher;
use crate::error::HashPipeError;
use std::fmt;
use std::str::FromStr;

/// Zero-argument constructor for a fresh, independent hasher
pub type HasherFactory = fn() -> Hasher;

/// Hash algorithm known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HashAlgorithm {
    /// Adler-32 checksum
    Adler32,
    /// BLAKE3 - Fast and cryptographically secure
    Blake3,
    /// CRC-32 (IEEE polynomial)
    Crc32,
    /// CRC-64 with the ISO 3309 polynomial
    Crc64Iso,
    /// FNV-1, 32-bit
    Fnv32,
    /// FNV-1a, 32-bit
    Fnv32a,
    /// FNV-1, 64-bit
    Fnv64,
    /// FNV-1a, 64-bit
    Fnv64a,
    /// FNV-1, 128-bit
    Fnv128,
    /// FNV-1a, 128-bit
    Fnv128a,
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256 - Standard cryptographic hash
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// SHA-512 truncated to 224 bits
    Sha512_224,
    /// SHA-512 truncated to 256 bits
    Sha512_256,
    /// SHA3-256
    Sha3_256,
    /// SHA3-512
    Sha3_512,
    /// XXHash3 - Ultra fast, non-cryptographic (128-bit)
    XXHash3,
    /// XXHash64 - Fast, non-cryptographic (64-bit)
    XXHash64,
}

impl HashAlgorithm {
    /// Every registered algorithm
    pub const ALL: [HashAlgorithm; 22] = [
        Self::Adler32,
        Self::Blake3,
        Self::Crc32,
        Self::Crc64Iso,
        Self::Fnv32,
        Self::Fnv32a,
        Self::Fnv64,
        Self::Fnv64a,
        Self::Fnv128,
        Self::Fnv128a,
        Self::Md5,
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_256,
        Self::Sha3_512,
        Self::XXHash3,
        Self::XXHash64,
    ];

    /// Registry name, as accepted on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Adler32 => "adler32",
            Self::Blake3 => "blake3",
            Self::Crc32 => "crc32",
            Self::Crc64Iso => "crc64-iso",
            Self::Fnv32 => "fnv32",
            Self::Fnv32a => "fnv32a",
            Self::Fnv64 => "fnv64",
            Self::Fnv64a => "fnv64a",
            Self::Fnv128 => "fnv128",
            Self::Fnv128a => "fnv128a",
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512/224",
            Self::Sha512_256 => "sha512/256",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_512 => "sha3-512",
            Self::XXHash3 => "xxhash3",
            Self::XXHash64 => "xxhash64",
        }
    }

    /// Get the output size in bytes
    pub fn output_size(&self) -> usize {
        match self {
            Self::Adler32 | Self::Crc32 | Self::Fnv32 | Self::Fnv32a => 4,
            Self::Crc64Iso | Self::Fnv64 | Self::Fnv64a | Self::XXHash64 => 8,
            Self::Fnv128 | Self::Fnv128a | Self::Md5 | Self::XXHash3 => 16,
            Self::Sha1 => 20,
            Self::Sha224 | Self::Sha512_224 => 28,
            Self::Blake3 | Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 | Self::Sha3_512 => 64,
        }
    }

    /// Whether this is a cryptographic hash rather than a checksum
    pub fn is_cryptographic(&self) -> bool {
        !matches!(
            self,
            Self::Adler32
                | Self::Crc32
                | Self::Crc64Iso
                | Self::Fnv32
                | Self::Fnv32a
                | Self::Fnv64
                | Self::Fnv64a
                | Self::Fnv128
                | Self::Fnv128a
                | Self::XXHash3
                | Self::XXHash64
        )
    }

    /// Factory producing a fresh hasher for this algorithm
    pub fn factory(&self) -> HasherFactory {
        match self {
            Self::Adler32 => || Hasher::new(HashAlgorithm::Adler32),
            Self::Blake3 => || Hasher::new(HashAlgorithm::Blake3),
            Self::Crc32 => || Hasher::new(HashAlgorithm::Crc32),
            Self::Crc64Iso => || Hasher::new(HashAlgorithm::Crc64Iso),
            Self::Fnv32 => || Hasher::new(HashAlgorithm::Fnv32),
            Self::Fnv32a => || Hasher::new(HashAlgorithm::Fnv32a),
            Self::Fnv64 => || Hasher::new(HashAlgorithm::Fnv64),
            Self::Fnv64a => || Hasher::new(HashAlgorithm::Fnv64a),
            Self::Fnv128 => || Hasher::new(HashAlgorithm::Fnv128),
            Self::Fnv128a => || Hasher::new(HashAlgorithm::Fnv128a),
            Self::Md5 => || Hasher::new(HashAlgorithm::Md5),
            Self::Sha1 => || Hasher::new(HashAlgorithm::Sha1),
            Self::Sha224 => || Hasher::new(HashAlgorithm::Sha224),
            Self::Sha256 => || Hasher::new(HashAlgorithm::Sha256),
            Self::Sha384 => || Hasher::new(HashAlgorithm::Sha384),
            Self::Sha512 => || Hasher::new(HashAlgorithm::Sha512),
            Self::Sha512_224 => || Hasher::new(HashAlgorithm::Sha512_224),
            Self::Sha512_256 => || Hasher::new(HashAlgorithm::Sha512_256),
            Self::Sha3_256 => || Hasher::new(HashAlgorithm::Sha3_256),
            Self::Sha3_512 => || Hasher::new(HashAlgorithm::Sha3_512),
            Self::XXHash3 => || Hasher::new(HashAlgorithm::XXHash3),
            Self::XXHash64 => || Hasher::new(HashAlgorithm::XXHash64),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HashAlgorithm {
    type Err = HashPipeError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        lookup(name).ok_or_else(|| HashPipeError::UnsupportedAlgorithm(name.to_string()))
    }
}

/// Resolve an algorithm by registry name
pub fn lookup(name: &str) -> Option<HashAlgorithm> {
    HashAlgorithm::ALL
        .iter()
        .copied()
        .find(|algorithm| algorithm.name() == name)
}

/// Check if the named algorithm is registered
pub fn is_supported(name: &str) -> bool {
    lookup(name).is_some()
}

/// Hasher factory for the named algorithm
pub fn factory(name: &str) -> Option<HasherFactory> {
    lookup(name).map(|algorithm| algorithm.factory())
}

/// All registered names, sorted
pub fn algorithm_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = HashAlgorithm::ALL.iter().map(|a| a.name()).collect();
    names.sort_unstable();
    names
}
