use menagerie::models::Occupation;

use crate::sources::FakeSource;

/// `count` occupations of `person_id`, with ids `"{person_id}_{n}"`.
pub fn generate_occupations(
    person_id: i64,
    count: usize,
    source: &mut impl FakeSource,
) -> Vec<Occupation> {
    (0..count)
        .map(|n| {
            let occupation = source.job();
            let company = source.company();
            Occupation {
                occupation_id: format!("{person_id}_{n}"),
                person_id,
                occupation,
                company,
            }
        })
        .collect()
}
