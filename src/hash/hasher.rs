//! Digest providers over the algorithm crates
//!
//! Every [`Hasher`] is an independent instance: workers never share hashing
//! state. The only shared piece is the CRC-64/ISO lookup table, which is
//! built once on first use and read concurrently afterwards.
//!
//! FNV-1a 64-bit comes from the `fnv` crate. The other FNV widths and the
//! FNV-1 variants have no streaming crate, so [`Fnv`] covers them.

use super::HashAlgorithm;
use crate::error::{IoResultExt, Result};
use crc::{Crc, CRC_64_GO_ISO};
use sha2::Digest as _;
use std::fmt;
use std::fs::File;
use std::hash::Hasher as StdHasher;
use std::io::{self, Read};
use std::path::Path;
use std::sync::OnceLock;

/// Default read buffer size for streaming a source into a hasher
pub const DEFAULT_READ_BUFFER: usize = 256 * 1024;

static CRC64_ISO: OnceLock<Crc<u64>> = OnceLock::new();

fn crc64_iso() -> &'static Crc<u64> {
    CRC64_ISO.get_or_init(|| Crc::<u64>::new(&CRC_64_GO_ISO))
}

/// Finished digest bytes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Digest(Vec<u8>);

impl Digest {
    /// Wrap raw digest bytes
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Digest length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the digest is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Hex rendering, lowercase unless `upper` is set
    pub fn to_hex(&self, upper: bool) -> String {
        if upper {
            hex::encode_upper(&self.0)
        } else {
            hex::encode(&self.0)
        }
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex(false))
    }
}

impl fmt::UpperHex for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex(true))
    }
}

/// Streaming FNV-1 / FNV-1a state at 32, 64 or 128 bits
#[derive(Debug, Clone, Copy)]
pub struct Fnv {
    hash: u128,
    prime: u128,
    mask: u128,
    bytes: usize,
    xor_first: bool,
}

impl Fnv {
    /// FNV-1 at `bits` (32, 64 or 128)
    pub fn fnv1(bits: u32) -> Self {
        Self::with_width(bits, false)
    }

    /// FNV-1a at `bits` (32, 64 or 128)
    pub fn fnv1a(bits: u32) -> Self {
        Self::with_width(bits, true)
    }

    fn with_width(bits: u32, xor_first: bool) -> Self {
        let (hash, prime, mask, bytes) = match bits {
            32 => (0x811c_9dc5, 0x0100_0193, u128::from(u32::MAX), 4),
            64 => (0xcbf2_9ce4_8422_2325, 0x0100_0000_01b3, u128::from(u64::MAX), 8),
            _ => (
                0x6c62_272e_07bb_0142_62b8_2175_6295_c58d,
                0x0000_0000_0100_0000_0000_0000_0000_013b,
                u128::MAX,
                16,
            ),
        };

        Self {
            hash,
            prime,
            mask,
            bytes,
            xor_first,
        }
    }

    /// Feed more data
    pub fn write(&mut self, data: &[u8]) {
        for &byte in data {
            if self.xor_first {
                self.hash ^= u128::from(byte);
                self.hash = self.hash.wrapping_mul(self.prime) & self.mask;
            } else {
                self.hash = self.hash.wrapping_mul(self.prime) & self.mask;
                self.hash ^= u128::from(byte);
            }
        }
    }

    /// Big-endian digest bytes at the configured width
    pub fn finish(&self) -> Vec<u8> {
        self.hash.to_be_bytes()[16 - self.bytes..].to_vec()
    }
}

/// Unified hasher that supports all algorithms
pub enum Hasher {
    /// Adler-32
    Adler32(adler2::Adler32),
    /// BLAKE3
    Blake3(blake3::Hasher),
    /// CRC-32 (IEEE)
    Crc32(crc32fast::Hasher),
    /// CRC-64/ISO over the shared table
    Crc64Iso(crc::Digest<'static, u64>),
    /// FNV-1 32-bit
    Fnv32(Fnv),
    /// FNV-1a 32-bit
    Fnv32a(Fnv),
    /// FNV-1 64-bit
    Fnv64(Fnv),
    /// FNV-1a 64-bit
    Fnv64a(fnv::FnvHasher),
    /// FNV-1 128-bit
    Fnv128(Fnv),
    /// FNV-1a 128-bit
    Fnv128a(Fnv),
    /// MD5
    Md5(md5::Md5),
    /// SHA-1
    Sha1(sha1::Sha1),
    /// SHA-224
    Sha224(sha2::Sha224),
    /// SHA-256
    Sha256(sha2::Sha256),
    /// SHA-384
    Sha384(sha2::Sha384),
    /// SHA-512
    Sha512(sha2::Sha512),
    /// SHA-512/224
    Sha512_224(sha2::Sha512_224),
    /// SHA-512/256
    Sha512_256(sha2::Sha512_256),
    /// SHA3-256
    Sha3_256(sha3::Sha3_256),
    /// SHA3-512
    Sha3_512(sha3::Sha3_512),
    /// XXHash3 128-bit
    XXHash3(xxhash_rust::xxh3::Xxh3),
    /// XXHash64
    XXHash64(xxhash_rust::xxh64::Xxh64),
}

impl Hasher {
    /// Create a new hasher for the given algorithm
    pub fn new(algorithm: HashAlgorithm) -> Self {
        match algorithm {
            HashAlgorithm::Adler32 => Self::Adler32(adler2::Adler32::new()),
            HashAlgorithm::Blake3 => Self::Blake3(blake3::Hasher::new()),
            HashAlgorithm::Crc32 => Self::Crc32(crc32fast::Hasher::new()),
            HashAlgorithm::Crc64Iso => Self::Crc64Iso(crc64_iso().digest()),
            HashAlgorithm::Fnv32 => Self::Fnv32(Fnv::fnv1(32)),
            HashAlgorithm::Fnv32a => Self::Fnv32a(Fnv::fnv1a(32)),
            HashAlgorithm::Fnv64 => Self::Fnv64(Fnv::fnv1(64)),
            HashAlgorithm::Fnv64a => Self::Fnv64a(fnv::FnvHasher::default()),
            HashAlgorithm::Fnv128 => Self::Fnv128(Fnv::fnv1(128)),
            HashAlgorithm::Fnv128a => Self::Fnv128a(Fnv::fnv1a(128)),
            HashAlgorithm::Md5 => Self::Md5(md5::Md5::new()),
            HashAlgorithm::Sha1 => Self::Sha1(sha1::Sha1::new()),
            HashAlgorithm::Sha224 => Self::Sha224(sha2::Sha224::new()),
            HashAlgorithm::Sha256 => Self::Sha256(sha2::Sha256::new()),
            HashAlgorithm::Sha384 => Self::Sha384(sha2::Sha384::new()),
            HashAlgorithm::Sha512 => Self::Sha512(sha2::Sha512::new()),
            HashAlgorithm::Sha512_224 => Self::Sha512_224(sha2::Sha512_224::new()),
            HashAlgorithm::Sha512_256 => Self::Sha512_256(sha2::Sha512_256::new()),
            HashAlgorithm::Sha3_256 => Self::Sha3_256(sha3::Sha3_256::new()),
            HashAlgorithm::Sha3_512 => Self::Sha3_512(sha3::Sha3_512::new()),
            HashAlgorithm::XXHash3 => Self::XXHash3(xxhash_rust::xxh3::Xxh3::new()),
            HashAlgorithm::XXHash64 => Self::XXHash64(xxhash_rust::xxh64::Xxh64::new(0)),
        }
    }

    /// Get the algorithm this hasher uses
    pub fn algorithm(&self) -> HashAlgorithm {
        match self {
            Self::Adler32(_) => HashAlgorithm::Adler32,
            Self::Blake3(_) => HashAlgorithm::Blake3,
            Self::Crc32(_) => HashAlgorithm::Crc32,
            Self::Crc64Iso(_) => HashAlgorithm::Crc64Iso,
            Self::Fnv32(_) => HashAlgorithm::Fnv32,
            Self::Fnv32a(_) => HashAlgorithm::Fnv32a,
            Self::Fnv64(_) => HashAlgorithm::Fnv64,
            Self::Fnv64a(_) => HashAlgorithm::Fnv64a,
            Self::Fnv128(_) => HashAlgorithm::Fnv128,
            Self::Fnv128a(_) => HashAlgorithm::Fnv128a,
            Self::Md5(_) => HashAlgorithm::Md5,
            Self::Sha1(_) => HashAlgorithm::Sha1,
            Self::Sha224(_) => HashAlgorithm::Sha224,
            Self::Sha256(_) => HashAlgorithm::Sha256,
            Self::Sha384(_) => HashAlgorithm::Sha384,
            Self::Sha512(_) => HashAlgorithm::Sha512,
            Self::Sha512_224(_) => HashAlgorithm::Sha512_224,
            Self::Sha512_256(_) => HashAlgorithm::Sha512_256,
            Self::Sha3_256(_) => HashAlgorithm::Sha3_256,
            Self::Sha3_512(_) => HashAlgorithm::Sha3_512,
            Self::XXHash3(_) => HashAlgorithm::XXHash3,
            Self::XXHash64(_) => HashAlgorithm::XXHash64,
        }
    }

    /// Update the hasher with more data
    pub fn update(&mut self, data: &[u8]) {
        match self {
            Self::Adler32(h) => h.write_slice(data),
            Self::Blake3(h) => {
                h.update(data);
            }
            Self::Crc32(h) => h.update(data),
            Self::Crc64Iso(h) => h.update(data),
            Self::Fnv32(h) | Self::Fnv32a(h) | Self::Fnv64(h) => h.write(data),
            Self::Fnv64a(h) => h.write(data),
            Self::Fnv128(h) | Self::Fnv128a(h) => h.write(data),
            Self::Md5(h) => h.update(data),
            Self::Sha1(h) => h.update(data),
            Self::Sha224(h) => h.update(data),
            Self::Sha256(h) => h.update(data),
            Self::Sha384(h) => h.update(data),
            Self::Sha512(h) => h.update(data),
            Self::Sha512_224(h) => h.update(data),
            Self::Sha512_256(h) => h.update(data),
            Self::Sha3_256(h) => h.update(data),
            Self::Sha3_512(h) => h.update(data),
            Self::XXHash3(h) => h.update(data),
            Self::XXHash64(h) => h.update(data),
        }
    }

    /// Finalize and get the digest.
    ///
    /// Integer checksums are rendered big-endian so their hex form reads
    /// the same as the conventional numeric notation.
    pub fn finalize(self) -> Digest {
        let bytes = match self {
            Self::Adler32(h) => h.checksum().to_be_bytes().to_vec(),
            Self::Blake3(h) => h.finalize().as_bytes().to_vec(),
            Self::Crc32(h) => h.finalize().to_be_bytes().to_vec(),
            Self::Crc64Iso(h) => h.finalize().to_be_bytes().to_vec(),
            Self::Fnv32(h) | Self::Fnv32a(h) | Self::Fnv64(h) => h.finish(),
            Self::Fnv64a(h) => h.finish().to_be_bytes().to_vec(),
            Self::Fnv128(h) | Self::Fnv128a(h) => h.finish(),
            Self::Md5(h) => h.finalize().to_vec(),
            Self::Sha1(h) => h.finalize().to_vec(),
            Self::Sha224(h) => h.finalize().to_vec(),
            Self::Sha256(h) => h.finalize().to_vec(),
            Self::Sha384(h) => h.finalize().to_vec(),
            Self::Sha512(h) => h.finalize().to_vec(),
            Self::Sha512_224(h) => h.finalize().to_vec(),
            Self::Sha512_256(h) => h.finalize().to_vec(),
            Self::Sha3_256(h) => h.finalize().to_vec(),
            Self::Sha3_512(h) => h.finalize().to_vec(),
            Self::XXHash3(h) => h.digest128().to_be_bytes().to_vec(),
            Self::XXHash64(h) => h.digest().to_be_bytes().to_vec(),
        };
        Digest(bytes)
    }
}

/// Consume a reader fully and return its digest with the byte count.
///
/// The reader is dropped before returning, on success and on error.
pub fn hash_reader<R: Read>(
    algorithm: HashAlgorithm,
    mut reader: R,
    buffer_size: usize,
) -> io::Result<(Digest, u64)> {
    let mut hasher = Hasher::new(algorithm);
    let mut buffer = vec![0u8; buffer_size.max(1)];
    let mut total = 0u64;

    loop {
        let bytes_read = match reader.read(&mut buffer) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };

        hasher.update(&buffer[..bytes_read]);
        total += bytes_read as u64;
    }

    Ok((hasher.finalize(), total))
}

/// Compute the digest of a file
pub fn hash_file(path: &Path, algorithm: HashAlgorithm) -> Result<Digest> {
    let file = File::open(path).with_path(path)?;
    let (digest, _) = hash_reader(algorithm, file, DEFAULT_READ_BUFFER).with_path(path)?;
    Ok(digest)
}

/// Compute the digest of data in memory
pub fn hash_bytes(data: &[u8], algorithm: HashAlgorithm) -> Digest {
    let mut hasher = Hasher::new(algorithm);
    hasher.update(data);
    hasher.finalize()
}
