// src/models/content.rs
// DOCUMENTATION: Static park content
// PURPOSE: Amenities, rates, contact info and gallery seed images.
// Immutable, compiled into the binary.

use serde::Serialize;

use super::{Category, GalleryImage};

#[derive(Debug, Clone, Serialize)]
pub struct Amenity {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    /// Icon name understood by the front end
    pub icon: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rate {
    pub period: &'static str,
    pub price: &'static str,
    pub details: &'static [&'static str],
    pub featured: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParkInfo {
    pub name: &'static str,
    pub address: &'static str,
    pub phone: &'static str,
    pub email: &'static str,
    pub office_hours: &'static str,
    pub location: GeoPoint,
    pub directions_url: &'static str,
    pub rates_note: &'static str,
}

pub static AMENITIES: [Amenity; 6] = [
    Amenity {
        id: "1",
        title: "Full Hookups",
        description: "30/50 Amp electrical, water, and sewer at every site.",
        icon: "Zap",
    },
    Amenity {
        id: "2",
        title: "High-Speed Wi-Fi",
        description: "Complimentary high-speed internet throughout the park.",
        icon: "Wifi",
    },
    Amenity {
        id: "3",
        title: "Laundry Facilities",
        description: "Modern, clean laundry room available 24/7.",
        icon: "RefreshCw",
    },
    Amenity {
        id: "4",
        title: "Pet Friendly",
        description: "We love your furry friends! Plenty of green space for walks.",
        icon: "Dog",
    },
    Amenity {
        id: "5",
        title: "Clean Restrooms",
        description: "Meticulously maintained showers and restroom facilities.",
        icon: "ShowerHead",
    },
    Amenity {
        id: "6",
        title: "Spacious Sites",
        description: "Concrete pads and wide spaces for easy maneuvering.",
        icon: "Maximize",
    },
];

pub static RATES: [Rate; 3] = [
    Rate {
        period: "Daily",
        price: "$45",
        details: &["Full Hookups", "High-speed Wi-Fi", "All Amenities Included"],
        featured: false,
    },
    Rate {
        period: "Weekly",
        price: "$250",
        details: &["Best for Short Stays", "Full Hookups Included", "Laundry Access"],
        featured: true,
    },
    Rate {
        period: "Monthly",
        price: "$650",
        details: &["Electricity Metered", "Extended Stay Discount", "Long-term Community"],
        featured: false,
    },
];

pub static PARK_INFO: ParkInfo = ParkInfo {
    name: "Mountain View RV Park",
    address: "1200 West Broadway, Van Horn, TX 79855",
    phone: "(432) 283-0123",
    email: "stay@mountainviewrvvanhorn.com",
    office_hours: "Daily: 8:00 AM - 7:00 PM",
    location: GeoPoint {
        lat: 31.0429,
        lng: -104.8327,
    },
    directions_url:
        "https://www.google.com/maps/dir/?api=1&destination=1200+West+Broadway,Van+Horn,TX+79855",
    rates_note: "Monthly rates do not include electricity which is metered and billed \
                 separately at our current rate.",
};

struct SeedImage {
    url: &'static str,
    title: &'static str,
    category: Category,
    description: &'static str,
}

static SEED_IMAGES: [SeedImage; 6] = [
    SeedImage {
        url: "https://images.unsplash.com/photo-1523987355523-c7b5b0dd90a7?w=1200",
        title: "Sunset Over the Sites",
        category: Category::Park,
        description: "Evening light across the pull-through sites.",
    },
    SeedImage {
        url: "https://images.unsplash.com/photo-1464822759023-fed622ff2c3b?w=1200",
        title: "Sierra Diablo Range",
        category: Category::Scenery,
        description: "The mountains that give the park its name.",
    },
    SeedImage {
        url: "https://images.unsplash.com/photo-1519681393784-d120267933ba?w=1200",
        title: "West Texas Night Sky",
        category: Category::Scenery,
        description: "Dark skies near McDonald Observatory country.",
    },
    SeedImage {
        url: "https://images.unsplash.com/photo-1545173168-9f1947eebb7f?w=1200",
        title: "Laundry Room",
        category: Category::Facilities,
        description: "Clean washers and dryers, open 24/7.",
    },
    SeedImage {
        url: "https://images.unsplash.com/photo-1504280390367-361c6d9f38f4?w=1200",
        title: "Spacious Pull-Throughs",
        category: Category::Park,
        description: "Concrete pads with full hookups.",
    },
    SeedImage {
        url: "https://images.unsplash.com/photo-1548199973-03cce0bbc87b?w=1200",
        title: "Pet Walking Area",
        category: Category::General,
        description: "Green space for your four-legged travelers.",
    },
];

/// Seed images as gallery records (no id, no storage path)
pub fn seed_gallery_images() -> Vec<GalleryImage> {
    SEED_IMAGES
        .iter()
        .map(|seed| GalleryImage {
            id: None,
            url: seed.url.to_string(),
            title: seed.title.to_string(),
            category: seed.category,
            description: Some(seed.description.to_string()),
            storage_path: None,
            created_at: None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exactly_one_featured_rate() {
        assert_eq!(RATES.iter().filter(|r| r.featured).count(), 1);
        assert_eq!(RATES[1].period, "Weekly");
    }

    #[test]
    fn test_seed_images_are_unpersisted() {
        let seeds = seed_gallery_images();
        assert_eq!(seeds.len(), SEED_IMAGES.len());
        assert!(seeds.iter().all(|img| img.id.is_none() && img.storage_path.is_none()));
    }
}
