//! Static journey and scenery catalogues.
//!
//! Read-only reference data: the session credits distance toward a journey
//! and carries a scenery id for the renderer, but never mutates either
//! catalogue.

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Journey {
    pub id: &'static str,
    pub name: &'static str,
    pub from: &'static str,
    pub to: &'static str,
    /// Total route length in meters.
    pub distance: f64,
    pub description: &'static str,
    /// Default scenery shown while rowing this route.
    pub scenery: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenery {
    pub id: &'static str,
    pub name: &'static str,
}

pub const DEFAULT_JOURNEY_ID: &str = "sf-to-alcatraz";
pub const DEFAULT_SCENERY_ID: &str = "mountain-lake";

pub const JOURNEYS: &[Journey] = &[
    Journey {
        id: "sf-to-alcatraz",
        name: "Alcatraz Escape",
        from: "San Francisco",
        to: "Alcatraz Island",
        distance: 4000.0,
        description: "A quick row across the bay to the infamous island prison",
        scenery: "mountain-lake",
    },
    Journey {
        id: "english-channel",
        name: "English Channel Crossing",
        from: "Dover, England",
        to: "Calais, France",
        distance: 5000.0,
        description: "Cross the famous channel between England and France",
        scenery: "english-countryside",
    },
    Journey {
        id: "thames-marathon",
        name: "Thames Marathon",
        from: "Oxford",
        to: "London",
        distance: 6000.0,
        description: "Row the length of the River Thames through the English countryside",
        scenery: "english-countryside",
    },
    Journey {
        id: "caribbean-islands",
        name: "Caribbean Island Hop",
        from: "Puerto Rico",
        to: "Virgin Islands",
        distance: 7000.0,
        description: "Island hop through the crystal blue Caribbean waters",
        scenery: "tropical-ocean",
    },
    Journey {
        id: "hawaii-molokai",
        name: "Molokai Channel",
        from: "Molokai",
        to: "Oahu",
        distance: 8000.0,
        description: "One of the most challenging ocean channels in the world",
        scenery: "tropical-ocean",
    },
    Journey {
        id: "norway-fjords",
        name: "Norwegian Fjords",
        from: "Bergen",
        to: "Flåm",
        distance: 9000.0,
        description: "Navigate through the stunning Norwegian fjord system",
        scenery: "mountain-lake",
    },
    Journey {
        id: "amazon-expedition",
        name: "Amazon Expedition",
        from: "Manaus",
        to: "Atlantic Ocean",
        distance: 10_000.0,
        description: "An epic journey down the mighty Amazon river",
        scenery: "tropical-ocean",
    },
    Journey {
        id: "arctic-passage",
        name: "Arctic Passage",
        from: "Greenland",
        to: "Iceland",
        distance: 10_000.0,
        description: "Brave the icy waters of the North Atlantic",
        scenery: "arctic",
    },
];

pub const SCENERIES: &[Scenery] = &[
    Scenery {
        id: "mountain-lake",
        name: "Mountain Lake",
    },
    Scenery {
        id: "tropical-ocean",
        name: "Tropical Ocean",
    },
    Scenery {
        id: "sunset-river",
        name: "Sunset River",
    },
    Scenery {
        id: "arctic",
        name: "Arctic",
    },
    Scenery {
        id: "english-countryside",
        name: "English Countryside",
    },
];

pub fn journey_by_id(id: &str) -> Option<&'static Journey> {
    JOURNEYS.iter().find(|j| j.id == id)
}

pub fn default_journey() -> &'static Journey {
    // The default id is a catalogue member by construction
    journey_by_id(DEFAULT_JOURNEY_ID).unwrap()
}

pub fn scenery_by_id(id: &str) -> Option<&'static Scenery> {
    SCENERIES.iter().find(|s| s.id == id)
}

/// Keyword table mapping spoken scenery descriptions onto catalogue ids.
/// First match wins; unknown text maps to nothing.
pub fn scenery_for_phrase(text: &str) -> Option<&'static str> {
    const KEYWORDS: &[(&str, &str)] = &[
        ("mountain", "mountain-lake"),
        ("lake", "mountain-lake"),
        ("tropical", "tropical-ocean"),
        ("ocean", "tropical-ocean"),
        ("beach", "tropical-ocean"),
        ("sunset", "sunset-river"),
        ("river", "sunset-river"),
        ("arctic", "arctic"),
        ("ice", "arctic"),
        ("cold", "arctic"),
        ("english", "english-countryside"),
        ("countryside", "english-countryside"),
        ("england", "english-countryside"),
    ];

    let lower = text.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(kw, _)| lower.contains(kw))
        .map(|(_, id)| *id)
}
