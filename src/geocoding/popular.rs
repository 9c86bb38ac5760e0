use crate::models::{Location, LocationKind};

/// Static suggestions shown while the search box is empty.
pub fn popular_locations() -> Vec<Location> {
    [
        ("thamel", "Thamel", "Kathmandu", 27.7154, 85.3123, LocationKind::Neighborhood, "Tourist hub with apartments and guest houses", 124),
        ("baneshwor", "Baneshwor", "Kathmandu", 27.6915, 85.3420, LocationKind::Neighborhood, "Central residential and commercial area", 98),
        ("budhanilkantha", "Budhanilkantha", "Kathmandu", 27.7650, 85.3653, LocationKind::Neighborhood, "Quiet villas on the northern edge of the valley", 61),
        ("boudhanath", "Boudhanath", "Kathmandu", 27.7215, 85.3620, LocationKind::Landmark, "Homes around the Boudha stupa", 47),
        ("jhamsikhel", "Jhamsikhel", "Lalitpur", 27.6780, 85.3060, LocationKind::Neighborhood, "Expat-friendly neighborhood near Patan", 83),
        ("bhaktapur-durbar-square", "Bhaktapur Durbar Square", "Bhaktapur", 27.6722, 85.4280, LocationKind::Landmark, "Heritage town houses", 29),
        ("lakeside", "Lakeside", "Pokhara", 28.2096, 83.9580, LocationKind::Neighborhood, "Rentals along Phewa Lake", 76),
    ]
    .into_iter()
    .map(
        |(id, name, city, latitude, longitude, kind, description, count)| Location {
            id: format!("popular-{id}"),
            name: name.to_string(),
            city: Some(city.to_string()),
            state: Some(if city == "Pokhara" { "Gandaki" } else { "Bagmati" }.to_string()),
            country: "Nepal".to_string(),
            latitude,
            longitude,
            description: Some(description.to_string()),
            kind,
            property_count: Some(count),
        },
    )
    .collect()
}
