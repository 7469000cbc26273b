//! Network constants: identifiers, human-readable prefixes and chain aliases.

/// Primary network identifier.
pub const MAINNET_ID: u32 = 1;
/// Public test network identifier.
pub const FUJI_ID: u32 = 5;
/// Local development network identifier.
pub const LOCAL_ID: u32 = 12345;

pub const MAINNET_HRP: &str = "avax";
pub const FUJI_HRP: &str = "fuji";
pub const LOCAL_HRP: &str = "local";
/// Prefix used for any network identifier not listed above.
pub const FALLBACK_HRP: &str = "custom";

/// Chain alias prepended to platform-chain addresses.
pub const P_CHAIN_ALIAS: &str = "P";

/// Network selected by a numeric network identifier.
///
/// # Examples
///
/// ```
/// use pkey_core::constants::Network;
/// assert_eq!(Network::from_id(5), Network::Fuji);
/// assert_eq!(Network::from_id(7).hrp(), "custom");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Network {
    /// Production network.
    Mainnet,
    /// Public test network.
    Fuji,
    /// Local development network.
    #[default]
    Local,
    /// Any other network identifier.
    Custom(u32),
}

impl Network {
    /// Map a numeric network identifier to a known network.
    pub fn from_id(network_id: u32) -> Self {
        match network_id {
            MAINNET_ID => Self::Mainnet,
            FUJI_ID => Self::Fuji,
            LOCAL_ID => Self::Local,
            other => Self::Custom(other),
        }
    }

    /// Numeric network identifier.
    pub fn id(&self) -> u32 {
        match self {
            Self::Mainnet => MAINNET_ID,
            Self::Fuji => FUJI_ID,
            Self::Local => LOCAL_ID,
            Self::Custom(id) => *id,
        }
    }

    /// Human-readable address prefix for this network.
    ///
    /// # Examples
    ///
    /// ```
    /// use pkey_core::constants::Network;
    /// assert_eq!(Network::Mainnet.hrp(), "avax");
    /// assert_eq!(Network::Local.hrp(), "local");
    /// ```
    pub fn hrp(&self) -> &'static str {
        match self {
            Self::Mainnet => MAINNET_HRP,
            Self::Fuji => FUJI_HRP,
            Self::Local => LOCAL_HRP,
            Self::Custom(_) => FALLBACK_HRP,
        }
    }
}

/// Human-readable prefix for a numeric network identifier.
pub fn hrp_for_network(network_id: u32) -> &'static str {
    Network::from_id(network_id).hrp()
}
