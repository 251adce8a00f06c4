//! Error types for the LPC17xx Ethernet driver
//!
//! Errors are organized by domain for better diagnostics:
//! - [`ConfigError`]: Configuration rejected before bring-up
//! - [`LinkError`]: PHY negotiation failures during bring-up
//! - [`DmaError`]: Descriptor ring and buffer issues
//! - [`IoError`]: Runtime TX/RX conditions
//!
//! The unified [`Error`] enum wraps all domain errors and is returned
//! by the tagged frame I/O methods. Bring-up returns [`LinkResult`], which
//! converts into the numeric [`ResultCode`] for callers that want an
//! integer status.

// =============================================================================
// Configuration Errors
// =============================================================================

/// Configuration errors
///
/// These errors are reported when a configuration or ring geometry is
/// rejected, before any register is touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Invalid configuration parameter
    InvalidConfig,
    /// Invalid PHY address (must be 0-31)
    InvalidPhyAddress,
    /// Fragment size is zero, unaligned, or exceeds the descriptor size field
    InvalidFragmentSize,
    /// Ring capacity is below two slots
    InvalidRingCapacity,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ConfigError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigError::InvalidConfig => "invalid configuration",
            ConfigError::InvalidPhyAddress => "invalid PHY address",
            ConfigError::InvalidFragmentSize => "invalid fragment size",
            ConfigError::InvalidRingCapacity => "invalid ring capacity",
        }
    }
}

// =============================================================================
// Link Errors
// =============================================================================

/// PHY negotiation errors
///
/// Both are fatal to the bring-up attempt that produced them. The caller
/// decides whether to run the full bring-up again.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Autonegotiation did not complete before its deadline
    AutonegotiationTimeout,
    /// Link did not come up before its deadline
    LinkTimeout,
}

impl core::fmt::Display for LinkError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl LinkError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            LinkError::AutonegotiationTimeout => "autonegotiation timed out",
            LinkError::LinkTimeout => "link-up timed out",
        }
    }
}

// =============================================================================
// DMA Errors
// =============================================================================

/// DMA buffer and descriptor errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DmaError {
    /// No descriptors available for transmission (TX ring full)
    NoDescriptorsAvailable,
    /// Frame too large for one fragment
    FrameTooLarge,
    /// Invalid frame length (zero)
    InvalidLength,
}

impl core::fmt::Display for DmaError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl DmaError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            DmaError::NoDescriptorsAvailable => "no descriptors available",
            DmaError::FrameTooLarge => "frame too large for fragment",
            DmaError::InvalidLength => "invalid frame length",
        }
    }
}

// =============================================================================
// I/O Errors
// =============================================================================

/// Runtime TX/RX errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IoError {
    /// Driver has not completed bring-up
    InvalidState,
    /// No received frame is pending
    NoFrame,
    /// PHY reports link down or autonegotiation incomplete
    LinkDown,
    /// Received frame has its error flag set and was dropped
    FrameError,
}

impl core::fmt::Display for IoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl IoError {
    /// Returns a human-readable description of the error
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            IoError::InvalidState => "invalid state for operation",
            IoError::NoFrame => "no frame pending",
            IoError::LinkDown => "link down",
            IoError::FrameError => "frame error",
        }
    }
}

// =============================================================================
// Unified Error Type
// =============================================================================

/// This enum wraps all domain-specific errors for unified error handling.
///
/// Match on the inner domain error for specific handling:
/// ```ignore
/// match eth.try_send(&frame) {
///     Err(Error::Dma(DmaError::NoDescriptorsAvailable)) => { /* retry later */ }
///     Err(Error::Io(IoError::LinkDown)) => { /* wait for link */ }
///     _ => {}
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration error
    Config(ConfigError),
    /// PHY negotiation error
    Link(LinkError),
    /// DMA error
    Dma(DmaError),
    /// I/O error
    Io(IoError),
}

impl core::fmt::Display for Error {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::Config(e) => write!(f, "config: {}", e.as_str()),
            Error::Link(e) => write!(f, "link: {}", e.as_str()),
            Error::Dma(e) => write!(f, "dma: {}", e.as_str()),
            Error::Io(e) => write!(f, "io: {}", e.as_str()),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<LinkError> for Error {
    fn from(e: LinkError) -> Self {
        Error::Link(e)
    }
}

impl From<DmaError> for Error {
    fn from(e: DmaError) -> Self {
        Error::Dma(e)
    }
}

impl From<IoError> for Error {
    fn from(e: IoError) -> Self {
        Error::Io(e)
    }
}

/// Result type alias for driver operations
pub type Result<T> = core::result::Result<T, Error>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = core::result::Result<T, ConfigError>;

/// Result type alias for PHY negotiation and bring-up
pub type LinkResult<T> = core::result::Result<T, LinkError>;

/// Result type alias for DMA operations
pub type DmaResult<T> = core::result::Result<T, DmaError>;

/// Result type alias for I/O operations
pub type IoResult<T> = core::result::Result<T, IoError>;

// =============================================================================
// Numeric Result Codes
// =============================================================================

/// Numeric bring-up result: 0 on success, negative on a negotiation timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i32)]
pub enum ResultCode {
    /// Bring-up completed and the link is up
    Ok = 0,
    /// Autonegotiation did not complete in time
    AutonegotiationTimeout = -1,
    /// Link did not come up in time
    LinkTimeout = -2,
}

impl ResultCode {
    /// Raw integer value of the code
    #[must_use]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Returns true for [`ResultCode::Ok`]
    #[must_use]
    pub const fn is_ok(self) -> bool {
        matches!(self, ResultCode::Ok)
    }
}

impl From<LinkError> for ResultCode {
    fn from(e: LinkError) -> Self {
        match e {
            LinkError::AutonegotiationTimeout => ResultCode::AutonegotiationTimeout,
            LinkError::LinkTimeout => ResultCode::LinkTimeout,
        }
    }
}

impl From<LinkResult<()>> for ResultCode {
    fn from(result: LinkResult<()>) -> Self {
        match result {
            Ok(()) => ResultCode::Ok,
            Err(e) => e.into(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
