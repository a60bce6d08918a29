//! SeaORM entities. Table names are plural, link table is `birthday_tags`.

pub mod birthday;
pub mod birthday_tag;
pub mod congratulation;
pub mod tag;
