//! Closed set of bodies the map knows how to place, and how each one is queried and drawn.

use std::fmt;
use std::str::FromStr;

use solarmap_horizons::Target;
use thiserror::Error;

/// Identifier of a supported body, ordered as the resolver visits them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectId {
    Sun,
    Mercury,
    Venus,
    Earth,
    Mars,
    Psp,
    Solo,
    StereoA,
    StereoB,
    Wind,
}

/// Colors used for markers and trails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerColor {
    Gold,
    Green,
    Blue,
    Red,
    Black,
    Cyan,
}

/// Everything that differs between bodies: query target, label, colors, reference circle.
#[derive(Debug, Clone, Copy)]
pub struct ObjectDescriptor {
    pub id: ObjectId,
    /// Identifier accepted on the command line and in configuration files.
    pub tag: &'static str,
    /// Text drawn next to the marker.
    pub label: &'static str,
    /// Ephemeris target; `None` for the Sun, which sits at the origin.
    pub target: Option<Target>,
    pub marker: MarkerColor,
    pub trail: MarkerColor,
    /// Planets get a dashed circle at their current heliocentric distance.
    pub reference_circle: bool,
}

/// Descriptor table in resolution order.
pub const CATALOG: &[ObjectDescriptor] = &[
    ObjectDescriptor {
        id: ObjectId::Sun,
        tag: "sun",
        label: "Sun",
        target: None,
        marker: MarkerColor::Gold,
        trail: MarkerColor::Gold,
        reference_circle: false,
    },
    ObjectDescriptor {
        id: ObjectId::Mercury,
        tag: "mercury",
        label: "Mercury",
        target: Some(Target {
            name: "Mercury Barycenter",
            command: "1",
        }),
        marker: MarkerColor::Green,
        trail: MarkerColor::Black,
        reference_circle: true,
    },
    ObjectDescriptor {
        id: ObjectId::Venus,
        tag: "venus",
        label: "Venus",
        target: Some(Target {
            name: "Venus Barycenter",
            command: "2",
        }),
        marker: MarkerColor::Green,
        trail: MarkerColor::Black,
        reference_circle: true,
    },
    ObjectDescriptor {
        id: ObjectId::Earth,
        tag: "earth",
        label: "Earth",
        target: Some(Target {
            name: "Earth-Moon Barycenter",
            command: "3",
        }),
        marker: MarkerColor::Blue,
        trail: MarkerColor::Black,
        reference_circle: true,
    },
    ObjectDescriptor {
        id: ObjectId::Mars,
        tag: "mars",
        label: "Mars",
        target: Some(Target {
            name: "Mars Barycenter",
            command: "4",
        }),
        marker: MarkerColor::Red,
        trail: MarkerColor::Black,
        reference_circle: true,
    },
    ObjectDescriptor {
        id: ObjectId::Psp,
        tag: "psp",
        label: "PSP",
        target: Some(Target {
            name: "PSP",
            command: "-96",
        }),
        marker: MarkerColor::Red,
        trail: MarkerColor::Red,
        reference_circle: false,
    },
    ObjectDescriptor {
        id: ObjectId::Solo,
        tag: "solo",
        label: "Solar Orbiter",
        target: Some(Target {
            name: "SOLO",
            command: "-144",
        }),
        marker: MarkerColor::Red,
        trail: MarkerColor::Red,
        reference_circle: false,
    },
    ObjectDescriptor {
        id: ObjectId::StereoA,
        tag: "stereo_a",
        label: "Stereo A",
        target: Some(Target {
            name: "STEREO-A",
            command: "-234",
        }),
        marker: MarkerColor::Black,
        trail: MarkerColor::Black,
        reference_circle: false,
    },
    ObjectDescriptor {
        id: ObjectId::StereoB,
        tag: "stereo_b",
        label: "Stereo B",
        target: Some(Target {
            name: "STEREO-B",
            command: "-235",
        }),
        marker: MarkerColor::Black,
        trail: MarkerColor::Black,
        reference_circle: false,
    },
    ObjectDescriptor {
        id: ObjectId::Wind,
        tag: "wind",
        label: "Wind",
        target: Some(Target {
            name: "WIND",
            command: "-8",
        }),
        marker: MarkerColor::Cyan,
        trail: MarkerColor::Black,
        reference_circle: false,
    },
];

/// Errors raised while turning user input into object identifiers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("unsupported object `{tag}` (supported: {})", supported_tags())]
    Unsupported { tag: String },
}

impl ObjectId {
    /// Every supported identifier in resolution order.
    pub const ALL: [ObjectId; 10] = [
        ObjectId::Sun,
        ObjectId::Mercury,
        ObjectId::Venus,
        ObjectId::Earth,
        ObjectId::Mars,
        ObjectId::Psp,
        ObjectId::Solo,
        ObjectId::StereoA,
        ObjectId::StereoB,
        ObjectId::Wind,
    ];

    /// Descriptor row for this body. `CATALOG` is laid out in declaration order.
    pub fn descriptor(self) -> &'static ObjectDescriptor {
        &CATALOG[self as usize]
    }

    pub fn tag(self) -> &'static str {
        self.descriptor().tag
    }

    pub fn label(self) -> &'static str {
        self.descriptor().label
    }
}

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for ObjectId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        CATALOG
            .iter()
            .find(|descriptor| descriptor.tag == wanted)
            .map(|descriptor| descriptor.id)
            .ok_or_else(|| CatalogError::Unsupported { tag: s.to_string() })
    }
}

/// Parse every tag, failing on the first one outside the catalog.
pub fn parse_objects<I, S>(tags: I) -> Result<Vec<ObjectId>, CatalogError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    tags.into_iter().map(|tag| tag.as_ref().parse()).collect()
}

fn supported_tags() -> String {
    CATALOG
        .iter()
        .map(|descriptor| descriptor.tag)
        .collect::<Vec<_>>()
        .join(", ")
}
