use menagerie::models::{Pet, Species};
use rand::Rng;

use crate::sources::FakeSource;

/// `count` pets owned by `owner_id`, with ids `"{owner_id}_{n}"`.
///
/// Names come from `source`, species uniformly from `rng`.
pub fn generate_pets(
    owner_id: i64,
    count: usize,
    source: &mut impl FakeSource,
    rng: &mut impl Rng,
) -> Vec<Pet> {
    (0..count)
        .map(|n| {
            let pet_name = source.first_name();
            let species = Species::ALL[rng.gen_range(0..Species::ALL.len())];
            Pet {
                pet_id: format!("{owner_id}_{n}"),
                owner_id,
                pet_name,
                species,
            }
        })
        .collect()
}
