use menagerie::models::Person;

use crate::sources::FakeSource;

/// Person `index`, named and addressed by `source` in that order.
pub fn generate_person(index: usize, source: &mut impl FakeSource) -> Person {
    let full_name = source.name();
    let address = source.address();
    Person {
        person_id: index as i64,
        full_name,
        address,
    }
}
