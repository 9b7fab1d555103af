//! Platform and architecture identifiers
//!
//! Names follow the consuming runtime's conventions (`darwin`, `win32`,
//! `x64`, `ia32`, ...) because they are baked into published artifact names.

use crate::error::{StcError, StcResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Operating system platform as named in artifact filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Aix,
    Android,
    Darwin,
    FreeBsd,
    Linux,
    OpenBsd,
    SunOs,
    Win32,
}

impl Platform {
    /// Detect the host platform
    pub fn detect() -> StcResult<Self> {
        Self::from_rust_os(std::env::consts::OS)
            .ok_or_else(|| StcError::UnsupportedPlatform(std::env::consts::OS.to_string()))
    }

    /// Map a Rust `target_os` name onto the runtime's platform name
    pub fn from_rust_os(os: &str) -> Option<Self> {
        match os {
            "aix" => Some(Self::Aix),
            "android" => Some(Self::Android),
            "macos" => Some(Self::Darwin),
            "freebsd" => Some(Self::FreeBsd),
            "linux" => Some(Self::Linux),
            "openbsd" => Some(Self::OpenBsd),
            "solaris" | "illumos" => Some(Self::SunOs),
            "windows" => Some(Self::Win32),
            _ => None,
        }
    }

    /// Name used in artifact filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Aix => "aix",
            Self::Android => "android",
            Self::Darwin => "darwin",
            Self::FreeBsd => "freebsd",
            Self::Linux => "linux",
            Self::OpenBsd => "openbsd",
            Self::SunOs => "sunos",
            Self::Win32 => "win32",
        }
    }

    /// Whether curl is commonly absent and a PowerShell download is needed
    pub fn needs_shell_fallback(&self) -> bool {
        matches!(self, Self::Win32)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = StcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "aix" => Ok(Self::Aix),
            "android" => Ok(Self::Android),
            "darwin" => Ok(Self::Darwin),
            "freebsd" => Ok(Self::FreeBsd),
            "linux" => Ok(Self::Linux),
            "openbsd" => Ok(Self::OpenBsd),
            "sunos" => Ok(Self::SunOs),
            "win32" => Ok(Self::Win32),
            other => Err(StcError::UnsupportedPlatform(other.to_string())),
        }
    }
}

/// CPU architecture as named in artifact filenames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Arch {
    Arm,
    Arm64,
    Ia32,
    Loong64,
    Mips,
    Mipsel,
    Ppc,
    Ppc64,
    Riscv64,
    S390x,
    X64,
}

impl Arch {
    /// Detect the host architecture
    pub fn detect() -> StcResult<Self> {
        Self::from_rust_arch(std::env::consts::ARCH)
            .ok_or_else(|| StcError::UnknownArch(std::env::consts::ARCH.to_string()))
    }

    /// Map a Rust `target_arch` name onto the runtime's architecture name
    ///
    /// Rust names both MIPS byte orders `mips`; the compile target's
    /// endianness picks between them.
    pub fn from_rust_arch(arch: &str) -> Option<Self> {
        match arch {
            "arm" => Some(Self::Arm),
            "aarch64" => Some(Self::Arm64),
            "x86" => Some(Self::Ia32),
            "loongarch64" => Some(Self::Loong64),
            "mips" if cfg!(target_endian = "little") => Some(Self::Mipsel),
            "mips" => Some(Self::Mips),
            "powerpc" => Some(Self::Ppc),
            "powerpc64" => Some(Self::Ppc64),
            "riscv64" => Some(Self::Riscv64),
            "s390x" => Some(Self::S390x),
            "x86_64" => Some(Self::X64),
            _ => None,
        }
    }

    /// Name used in artifact filenames
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Ia32 => "ia32",
            Self::Loong64 => "loong64",
            Self::Mips => "mips",
            Self::Mipsel => "mipsel",
            Self::Ppc => "ppc",
            Self::Ppc64 => "ppc64",
            Self::Riscv64 => "riscv64",
            Self::S390x => "s390x",
            Self::X64 => "x64",
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Arch {
    type Err = StcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "arm" => Ok(Self::Arm),
            "arm64" => Ok(Self::Arm64),
            "ia32" => Ok(Self::Ia32),
            "loong64" => Ok(Self::Loong64),
            "mips" => Ok(Self::Mips),
            "mipsel" => Ok(Self::Mipsel),
            "ppc" => Ok(Self::Ppc),
            "ppc64" => Ok(Self::Ppc64),
            "riscv64" => Ok(Self::Riscv64),
            "s390x" => Ok(Self::S390x),
            "x64" => Ok(Self::X64),
            other => Err(StcError::UnknownArch(other.to_string())),
        }
    }
}

/// Static platform → architectures table
///
/// Lists every architecture an old runtime might run under on a platform,
/// including emulated ones (Rosetta, QEMU, WoW64). Injected into the
/// installer so tests can substitute their own table.
#[derive(Debug, Clone, Copy)]
pub struct ArchTable {
    entries: &'static [(Platform, &'static [Arch])],
    host: Option<Arch>,
}

const BUILTIN_ARCHS: &[(Platform, &[Arch])] = &[
    (Platform::Darwin, &[Arch::Arm64, Arch::X64]),
    (Platform::Linux, &[Arch::Arm64, Arch::Arm, Arch::X64]),
    (Platform::Win32, &[Arch::Ia32, Arch::X64]),
];

impl ArchTable {
    /// The published platform table, falling back to the detected host arch
    pub fn builtin() -> Self {
        Self {
            entries: BUILTIN_ARCHS,
            host: Arch::detect().ok(),
        }
    }

    /// A custom table (used by tests)
    pub fn new(entries: &'static [(Platform, &'static [Arch])], host: Option<Arch>) -> Self {
        Self { entries, host }
    }

    /// Architectures to install for a platform, in declared order
    ///
    /// Platforms missing from the table get the host architecture only, or
    /// nothing if the host architecture is not one the runtime names.
    pub fn architectures_for(&self, platform: Platform) -> Vec<Arch> {
        match self.entries.iter().find(|(p, _)| *p == platform) {
            Some((_, archs)) => archs.to_vec(),
            None => self.host.into_iter().collect(),
        }
    }
}
