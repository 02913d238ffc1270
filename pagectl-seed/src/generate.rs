//! Synthetic rows for the products store
//!
//! Everything here is pure: callers pass the RNG (and the clock) in, so a
//! fixed seed reproduces the same dataset.

use chrono::{Duration, NaiveDateTime};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Paragraph, Sentence, Word};
use fake::faker::name::en::Name;
use fake::Fake;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::SeedError;

/// Fixed category names, inserted in this order
pub const CATEGORY_NAMES: [&str; 10] = [
    "Laptops",
    "Smartphones",
    "Audio",
    "Video",
    "Gaming",
    "Oficina",
    "Hogar",
    "Software",
    "Periféricos",
    "Tablets",
];

/// Leading word of every product name
pub const PRODUCT_TYPES: [&str; 7] = [
    "Laptop",
    "Mouse",
    "Monitor",
    "Teclado",
    "Auriculares",
    "Cámara",
    "Tablet",
];

/// Trailing word of every product name
pub const PRODUCT_ADJECTIVES: [&str; 8] = ["Pro", "Ultra", "Gaming", "Slim", "Max", "Lite", "X", "2024"];

/// Password stored for every seeded user
pub const USER_PASSWORD: &str = "123";

pub const MIN_PRICE: f64 = 10.0;
pub const MAX_PRICE: f64 = 5000.0;
pub const MAX_AGE_DAYS: i64 = 365;
pub const MAX_DESCRIPTION_CHARS: usize = 100;

#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: &'static str,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: &'static str,
    pub description: String,
}

#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub user_id: i64,
    /// Also used as `updated_at`
    pub created_at: NaiveDateTime,
    pub category_ids: Vec<i64>,
}

pub fn fake_user<R: Rng + ?Sized>(rng: &mut R) -> NewUser {
    NewUser {
        name: Name().fake_with_rng(rng),
        email: SafeEmail().fake_with_rng(rng),
        password: USER_PASSWORD,
    }
}

pub fn categories<R: Rng + ?Sized>(rng: &mut R) -> Vec<NewCategory> {
    CATEGORY_NAMES
        .iter()
        .map(|&name| NewCategory {
            name,
            description: Sentence(3..9).fake_with_rng(rng),
        })
        .collect()
}

/// `"{type} {Word} {adjective}"`
pub fn product_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let kind = PRODUCT_TYPES[rng.gen_range(0..PRODUCT_TYPES.len())];
    let word: String = Word().fake_with_rng(rng);
    let adjective = PRODUCT_ADJECTIVES[rng.gen_range(0..PRODUCT_ADJECTIVES.len())];
    format!("{kind} {} {adjective}", capitalize(&word))
}

/// Uniform in `[MIN_PRICE, MAX_PRICE]`, rounded to cents
pub fn price<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    let raw: f64 = rng.gen_range(MIN_PRICE..=MAX_PRICE);
    (raw * 100.0).round() / 100.0
}

pub fn created_at<R: Rng + ?Sized>(rng: &mut R, now: NaiveDateTime) -> NaiveDateTime {
    now - Duration::days(rng.gen_range(0..=MAX_AGE_DAYS))
}

pub fn description<R: Rng + ?Sized>(rng: &mut R) -> String {
    let text: String = Paragraph(1..3).fake_with_rng(rng);
    truncate_words(&text, MAX_DESCRIPTION_CHARS)
}

/// A product owned by a random user and linked to `links` distinct categories
pub fn fake_product<R: Rng + ?Sized>(
    rng: &mut R,
    owners: &[i64],
    category_ids: &[i64],
    links: usize,
    now: NaiveDateTime,
) -> Result<NewProduct, SeedError> {
    let user_id = *owners.choose(rng).ok_or(SeedError::NoOwners)?;
    if links > category_ids.len() {
        return Err(SeedError::invalid_plan(format!(
            "cannot link {links} categories per product with only {} categories",
            category_ids.len()
        )));
    }

    let name = product_name(rng);
    let description = description(rng);
    let price = price(rng);
    let created_at = created_at(rng, now);
    let category_ids = category_ids.choose_multiple(rng, links).copied().collect();

    Ok(NewProduct {
        name,
        description,
        price,
        user_id,
        created_at,
        category_ids,
    })
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Cut `text` to at most `max` chars, preferring a word boundary
fn truncate_words(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let cut: String = text.chars().take(max).collect();
    match cut.rfind(' ') {
        Some(pos) if pos > 0 => cut[..pos].trim_end_matches(|c: char| c == ',' || c == '.').to_string(),
        _ => cut,
    }
}
