//! Transport categories: the `products` query mask and display icons.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A transport category that can be requested from the trip API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransportType {
    ExpressTrain,
    RegionalTrain,
    ExpressBus,
    CommuterTrain,
    Subway,
    Tram,
    Bus,
    Ferry,
}

impl TransportType {
    /// Every category, in bit order.
    pub const ALL: [TransportType; 8] = [
        TransportType::ExpressTrain,
        TransportType::RegionalTrain,
        TransportType::ExpressBus,
        TransportType::CommuterTrain,
        TransportType::Subway,
        TransportType::Tram,
        TransportType::Bus,
        TransportType::Ferry,
    ];

    /// Bit value of this category in the `products` parameter.
    pub const fn bit(self) -> u16 {
        match self {
            TransportType::ExpressTrain => 2,
            TransportType::RegionalTrain => 4,
            TransportType::ExpressBus => 8,
            TransportType::CommuterTrain => 16,
            TransportType::Subway => 32,
            TransportType::Tram => 64,
            TransportType::Bus => 128,
            TransportType::Ferry => 256,
        }
    }
}

/// Upper bound (exclusive) the API accepts for `products`.
const PRODUCTS_CEILING: u16 = 511;

/// Bitmask of enabled transport categories.
///
/// The API treats "everything" as the default, so the mask is only sent
/// when it actually narrows the result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProductsMask(u16);

impl ProductsMask {
    /// Mask with every category enabled (2 + 4 + ... + 256).
    pub const ALL: ProductsMask = ProductsMask(510);

    /// Build a mask from the enabled categories.
    pub fn from_types(types: &[TransportType]) -> Self {
        Self(types.iter().fold(0, |acc, t| acc | t.bit()))
    }

    /// Raw mask value.
    pub fn bits(self) -> u16 {
        self.0
    }

    /// Value for the `products` query parameter, if it should be sent at all.
    ///
    /// The full mask (510) is left out too. Other clients send
    /// `products=510` explicitly; omitting it asks the API for the same set.
    ///
    /// # Examples
    ///
    /// ```
    /// use departure_board::domain::{ProductsMask, TransportType};
    ///
    /// let mask = ProductsMask::from_types(&[TransportType::Subway, TransportType::Bus]);
    /// assert_eq!(mask.query_value(), Some(160));
    ///
    /// let all = ProductsMask::from_types(&TransportType::ALL);
    /// assert_eq!(all.query_value(), None);
    /// ```
    pub fn query_value(self) -> Option<u16> {
        (self.0 > 1 && self.0 < PRODUCTS_CEILING && self.0 != Self::ALL.0).then_some(self.0)
    }
}

/// Icon shown next to a departure, chosen by the first character of its
/// category code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleIcon {
    Bus,
    Subway,
    Train,
    Ferry,
}

impl VehicleIcon {
    /// Every icon.
    pub const ALL: [VehicleIcon; 4] = [
        VehicleIcon::Bus,
        VehicleIcon::Subway,
        VehicleIcon::Train,
        VehicleIcon::Ferry,
    ];

    /// Map a category code prefix to an icon. Unknown prefixes have no icon.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(VehicleIcon::Bus),
            'S' | 'U' => Some(VehicleIcon::Subway),
            'J' => Some(VehicleIcon::Train),
            'F' => Some(VehicleIcon::Ferry),
            _ => None,
        }
    }

    /// Icon for a full category code such as `"BLT"` or `"JRE"`.
    pub fn from_type_code(code: &str) -> Option<Self> {
        code.chars().next().and_then(Self::from_char)
    }

    /// Default CSS class for the icon.
    pub fn default_class(self) -> &'static str {
        match self {
            VehicleIcon::Bus => "fa fa-bus",
            VehicleIcon::Subway => "fa fa-subway",
            VehicleIcon::Train => "fa fa-train",
            VehicleIcon::Ferry => "fa fa-ship",
        }
    }
}

impl fmt::Display for VehicleIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            VehicleIcon::Bus => "bus",
            VehicleIcon::Subway => "subway",
            VehicleIcon::Train => "train",
            VehicleIcon::Ferry => "ferry",
        };
        f.write_str(name)
    }
}
