//! Sample data inserted by the bootstrap routine.

pub struct SeedLanguage {
    pub name: &'static str,
    pub code: &'static str,
}

pub struct SeedCategory {
    pub name: &'static str,
    pub description: &'static str,
}

pub struct SeedTalent {
    pub name: &'static str,
    pub language: &'static str,
    pub category: &'static str,
    pub accent: &'static str,
    pub description: &'static str,
    pub sample_url: &'static str,
    pub hourly_rate: f64,
    pub lat: f64,
    pub lng: f64,
    pub pattern: &'static str,
    pub emotion: &'static str,
    pub region: &'static str,
    pub time_slot: &'static str,
}

pub const LANGUAGES: &[SeedLanguage] = &[
    SeedLanguage { name: "English", code: "en" },
    SeedLanguage { name: "Spanish", code: "es" },
    SeedLanguage { name: "French", code: "fr" },
    SeedLanguage { name: "German", code: "de" },
    SeedLanguage { name: "Japanese", code: "ja" },
    SeedLanguage { name: "Mandarin", code: "zh" },
    SeedLanguage { name: "Russian", code: "ru" },
];

pub const CATEGORIES: &[SeedCategory] = &[
    SeedCategory {
        name: "Commercial",
        description: "Voice overs for commercials and advertisements",
    },
    SeedCategory {
        name: "Narration",
        description: "Documentary and educational content narration",
    },
    SeedCategory {
        name: "Character",
        description: "Character voices for animation and games",
    },
    SeedCategory {
        name: "Audiobook",
        description: "Audiobook narration",
    },
    SeedCategory {
        name: "Corporate",
        description: "Corporate training and presentations",
    },
    SeedCategory {
        name: "IVR",
        description: "Interactive Voice Response systems",
    },
];

pub const TALENTS: &[SeedTalent] = &[
    SeedTalent {
        name: "Sarah Johnson",
        language: "English",
        category: "Commercial",
        accent: "American",
        description: "Professional voice artist with 10 years experience",
        sample_url: "https://example.com/sample1.mp3",
        hourly_rate: 150.0,
        lat: 40.7128,
        lng: -74.0060,
        pattern: "Professional",
        emotion: "Happy",
        region: "North America",
        time_slot: "Morning",
    },
    SeedTalent {
        name: "Jean Dupont",
        language: "French",
        category: "Narration",
        accent: "Parisian",
        description: "Experienced narrator and voice actor",
        sample_url: "https://example.com/sample2.mp3",
        hourly_rate: 130.0,
        lat: 48.8566,
        lng: 2.3522,
        pattern: "Calm",
        emotion: "Serious",
        region: "Europe",
        time_slot: "Evening",
    },
    SeedTalent {
        name: "Yuki Tanaka",
        language: "Japanese",
        category: "Character",
        accent: "Tokyo",
        description: "Specialized in anime and game voiceovers",
        sample_url: "https://example.com/sample3.mp3",
        hourly_rate: 140.0,
        lat: 35.6762,
        lng: 139.6503,
        pattern: "Energetic",
        emotion: "Excited",
        region: "Asia",
        time_slot: "Night",
    },
];
