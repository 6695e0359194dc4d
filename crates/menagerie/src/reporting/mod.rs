//! Aggregate views over a dataset and their chart renderings.

pub mod aggregates;
pub mod charts;

pub use aggregates::{
    Frequency, PersonActivity, PetCount, pets_per_person, pets_vs_occupations, popular_pet_names,
    species_distribution,
};
pub use charts::{
    ChartKind, ChartOutcome, ChartReport, TOP_PET_NAMES, render_chart, render_report, species_color,
};
