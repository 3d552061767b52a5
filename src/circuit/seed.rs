//! Reference circuits used to seed an in-memory store.

use super::model::{Circuit, CircuitId};

struct SeedRow {
    name: &'static str,
    slug: &'static str,
    location: &'static str,
    image_path: &'static str,
    length_km: f64,
    laps: u32,
    drs_zones: u32,
    opened: i32,
}

const SEED: &[SeedRow] = &[
    SeedRow {
        name: "Melbourne Grand Prix Circuit",
        slug: "melbourne",
        location: "Melbourne, Australia",
        image_path: "/images/melbourne2.avif",
        length_km: 5.278,
        laps: 58,
        drs_zones: 4,
        opened: 1996,
    },
    SeedRow {
        name: "Shanghai International Circuit",
        slug: "shanghai",
        location: "Shanghai, China",
        image_path: "/images/shanghai.jpg",
        length_km: 5.451,
        laps: 56,
        drs_zones: 2,
        opened: 2004,
    },
    SeedRow {
        name: "Suzuka Circuit",
        slug: "suzuka",
        location: "Suzuka, Japan",
        image_path: "/images/suzuka.webp",
        length_km: 5.807,
        laps: 53,
        drs_zones: 1,
        opened: 1962,
    },
    SeedRow {
        name: "Bahrain International Circuit",
        slug: "bahrain",
        location: "Sakhir, Bahrain",
        image_path: "/images/bahrain.jpg",
        length_km: 5.412,
        laps: 57,
        drs_zones: 3,
        opened: 2004,
    },
    SeedRow {
        name: "Jeddah Corniche Circuit",
        slug: "jeddah",
        location: "Jeddah, Saudi Arabia",
        image_path: "/images/jeddah.jpg",
        length_km: 6.174,
        laps: 50,
        drs_zones: 3,
        opened: 2021,
    },
    SeedRow {
        name: "Miami International Autodrome",
        slug: "miami",
        location: "Miami, Florida, USA",
        image_path: "/images/miami3.avif",
        length_km: 5.412,
        laps: 57,
        drs_zones: 3,
        opened: 2022,
    },
    SeedRow {
        name: "Autodromo Enzo e Dino Ferrari (Imola)",
        slug: "imola",
        location: "Imola, Italy",
        image_path: "/images/imola2.webp",
        length_km: 4.909,
        laps: 63,
        drs_zones: 1,
        opened: 1953,
    },
    SeedRow {
        name: "Circuit de Monaco",
        slug: "monaco",
        location: "Monaco",
        image_path: "/images/monaco.avif",
        length_km: 3.337,
        laps: 78,
        drs_zones: 1,
        opened: 1929,
    },
    SeedRow {
        name: "Circuit de Barcelona-Catalunya",
        slug: "barcelona",
        location: "Barcelona, Spain",
        image_path: "/images/barcelona.avif",
        length_km: 4.657,
        laps: 66,
        drs_zones: 2,
        opened: 1991,
    },
];

/// The reference circuits with ids 1 through 9.
///
/// Their slugs are hand-picked short forms, not derived from the names. The
/// first update to any of them re-derives the slug.
pub fn reference_circuits() -> Vec<Circuit> {
    SEED.iter()
        .zip(1u64..)
        .map(|(row, id)| Circuit {
            id: CircuitId::Seq(id),
            name: row.name.to_string(),
            slug: row.slug.to_string(),
            location: row.location.to_string(),
            image_path: row.image_path.to_string(),
            length_km: row.length_km,
            laps: row.laps,
            drs_zones: row.drs_zones,
            opened: row.opened,
        })
        .collect()
}
