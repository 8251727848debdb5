use super::models::{City, PointOfInterest};

/// Demo cities loaded into every fresh store, with their points of interest
pub fn cities() -> Vec<City> {
    let mut new_york = City::new(1, "New York City", Some("The one with the big park."));
    new_york.points_of_interest = vec![
        point(1, 1, "Central Park", "The most visited urban park in the United States."),
        point(2, 1, "Empire State Building", "A 102-story skyscraper located in Midtown Manhattan."),
    ];

    let mut antwerp = City::new(
        2,
        "Antwerp",
        Some("The one with the cathedral that really never finished."),
    );
    antwerp.points_of_interest = vec![
        point(3, 2, "Cathedral Of Our Lady", "A Gothic style cathedral conceived by Jan and Pieter Appelmans."),
        point(4, 2, "Antwerp Central Station", "The finest example of railway architecture in Belgium."),
    ];

    let mut paris = City::new(3, "Paris", Some("The one with that big tower."));
    paris.points_of_interest = vec![
        point(
            5,
            3,
            "Eiffel Tower",
            "A wrought iron lattice tower on the Champ de Mars, named after engineer Gustave Eiffel.",
        ),
        point(6, 3, "The Louvre", "The world's largest museum."),
    ];

    vec![new_york, antwerp, paris]
}

fn point(id: i32, city_id: i32, name: &str, description: &str) -> PointOfInterest {
    PointOfInterest {
        id,
        name: name.to_string(),
        description: Some(description.to_string()),
        city_id,
    }
}
