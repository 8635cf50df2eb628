//! Database Models - structs representing database tables (used by sqlx/serde).
//!
//! Each entity has a canonical record struct, a `New*` insert payload, and an
//! `Update*` partial patch whose absent fields keep the stored values.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::collections::BTreeMap;

use crate::error::ApiError;

// ============================================================================
// Validation helpers
// ============================================================================

lazy_static::lazy_static! {
    /// Syntactic email check: something@something.tld, no whitespace
    static ref EMAIL_REGEX: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

fn require_text(
    errors: &mut BTreeMap<&'static str, String>,
    field: &'static str,
    label: &str,
    value: &str,
) {
    if value.trim().is_empty() {
        errors.insert(field, format!("{} is required", label));
    }
}

fn require_min_chars(
    errors: &mut BTreeMap<&'static str, String>,
    field: &'static str,
    label: &str,
    value: &str,
    min: usize,
) {
    if value.trim().chars().count() < min {
        errors.insert(
            field,
            format!("{} must be at least {} characters", label, min),
        );
    }
}

fn require_email(errors: &mut BTreeMap<&'static str, String>, field: &'static str, value: &str) {
    if !EMAIL_REGEX.is_match(value.trim()) {
        errors.insert(field, "Please enter a valid email".to_string());
    }
}

fn require_level(errors: &mut BTreeMap<&'static str, String>, level: i32) {
    if !(0..=100).contains(&level) {
        errors.insert("level", "Level must be between 0 and 100".to_string());
    }
}

fn require_price(errors: &mut BTreeMap<&'static str, String>, price: i32) {
    if price < 0 {
        errors.insert("price", "Price must not be negative".to_string());
    }
}

fn finish(errors: BTreeMap<&'static str, String>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation(errors))
    }
}

fn default_true() -> bool {
    true
}

// ============================================================================
// User
// ============================================================================

/// Admin account row. Deliberately not `Serialize`; responses use
/// [`PublicUser`] so the password hash can never leak into a body.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password_hash: String,
}

/// User shape returned to clients (login response, profile).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: i32,
    pub username: String,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        PublicUser {
            id: user.id,
            username: user.username,
        }
    }
}

// ============================================================================
// Project
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image: String,
    pub technologies: Vec<String>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProject {
    pub title: String,
    pub description: String,
    pub image: String,
    #[serde(default)]
    pub technologies: Vec<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub github_url: Option<String>,
    #[serde(default)]
    pub featured: bool,
}

impl NewProject {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_text(&mut errors, "title", "Title", &self.title);
        require_text(&mut errors, "description", "Description", &self.description);
        require_text(&mut errors, "image", "Image", &self.image);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub technologies: Option<Vec<String>>,
    pub live_url: Option<String>,
    pub github_url: Option<String>,
    pub featured: Option<bool>,
}

impl UpdateProject {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(title) = &self.title {
            require_text(&mut errors, "title", "Title", title);
        }
        if let Some(description) = &self.description {
            require_text(&mut errors, "description", "Description", description);
        }
        if let Some(image) = &self.image {
            require_text(&mut errors, "image", "Image", image);
        }
        finish(errors)
    }

    /// Merge this patch onto the stored record; absent fields keep prior values.
    pub fn apply(self, existing: Project) -> Project {
        Project {
            id: existing.id,
            title: self.title.unwrap_or(existing.title),
            description: self.description.unwrap_or(existing.description),
            image: self.image.unwrap_or(existing.image),
            technologies: self.technologies.unwrap_or(existing.technologies),
            live_url: self.live_url.or(existing.live_url),
            github_url: self.github_url.or(existing.github_url),
            featured: self.featured.unwrap_or(existing.featured),
            created_at: existing.created_at,
        }
    }
}

// ============================================================================
// Skill
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub level: i32,
    pub icon: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSkill {
    pub name: String,
    pub category: String,
    pub level: i32,
    pub icon: String,
}

impl NewSkill {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_text(&mut errors, "name", "Name", &self.name);
        require_text(&mut errors, "category", "Category", &self.category);
        require_text(&mut errors, "icon", "Icon", &self.icon);
        require_level(&mut errors, self.level);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSkill {
    pub name: Option<String>,
    pub category: Option<String>,
    pub level: Option<i32>,
    pub icon: Option<String>,
}

impl UpdateSkill {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(name) = &self.name {
            require_text(&mut errors, "name", "Name", name);
        }
        if let Some(category) = &self.category {
            require_text(&mut errors, "category", "Category", category);
        }
        if let Some(icon) = &self.icon {
            require_text(&mut errors, "icon", "Icon", icon);
        }
        if let Some(level) = self.level {
            require_level(&mut errors, level);
        }
        finish(errors)
    }

    pub fn apply(self, existing: Skill) -> Skill {
        Skill {
            id: existing.id,
            name: self.name.unwrap_or(existing.name),
            category: self.category.unwrap_or(existing.category),
            level: self.level.unwrap_or(existing.level),
            icon: self.icon.unwrap_or(existing.icon),
        }
    }
}

// ============================================================================
// Activity
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub frequency: String,
    pub icon: String,
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewActivity {
    pub title: String,
    pub description: String,
    pub frequency: String,
    pub icon: String,
    #[serde(default = "default_true")]
    pub active: bool,
}

impl NewActivity {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_text(&mut errors, "title", "Title", &self.title);
        require_text(&mut errors, "description", "Description", &self.description);
        require_text(&mut errors, "frequency", "Frequency", &self.frequency);
        require_text(&mut errors, "icon", "Icon", &self.icon);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateActivity {
    pub title: Option<String>,
    pub description: Option<String>,
    pub frequency: Option<String>,
    pub icon: Option<String>,
    pub active: Option<bool>,
}

impl UpdateActivity {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(title) = &self.title {
            require_text(&mut errors, "title", "Title", title);
        }
        if let Some(description) = &self.description {
            require_text(&mut errors, "description", "Description", description);
        }
        if let Some(frequency) = &self.frequency {
            require_text(&mut errors, "frequency", "Frequency", frequency);
        }
        if let Some(icon) = &self.icon {
            require_text(&mut errors, "icon", "Icon", icon);
        }
        finish(errors)
    }

    pub fn apply(self, existing: Activity) -> Activity {
        Activity {
            id: existing.id,
            title: self.title.unwrap_or(existing.title),
            description: self.description.unwrap_or(existing.description),
            frequency: self.frequency.unwrap_or(existing.frequency),
            icon: self.icon.unwrap_or(existing.icon),
            active: self.active.unwrap_or(existing.active),
        }
    }
}

// ============================================================================
// PricingPlan
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricingPlan {
    pub id: i32,
    pub name: String,
    /// Smallest currency unit (e.g. whole dollars for this site).
    pub price: i32,
    pub duration: String,
    pub features: Vec<String>,
    pub popular: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPricingPlan {
    pub name: String,
    pub price: i32,
    pub duration: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub popular: bool,
}

impl NewPricingPlan {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_text(&mut errors, "name", "Name", &self.name);
        require_text(&mut errors, "duration", "Duration", &self.duration);
        require_price(&mut errors, self.price);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePricingPlan {
    pub name: Option<String>,
    pub price: Option<i32>,
    pub duration: Option<String>,
    pub features: Option<Vec<String>>,
    pub popular: Option<bool>,
}

impl UpdatePricingPlan {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(name) = &self.name {
            require_text(&mut errors, "name", "Name", name);
        }
        if let Some(duration) = &self.duration {
            require_text(&mut errors, "duration", "Duration", duration);
        }
        if let Some(price) = self.price {
            require_price(&mut errors, price);
        }
        finish(errors)
    }

    pub fn apply(self, existing: PricingPlan) -> PricingPlan {
        PricingPlan {
            id: existing.id,
            name: self.name.unwrap_or(existing.name),
            price: self.price.unwrap_or(existing.price),
            duration: self.duration.unwrap_or(existing.duration),
            features: self.features.unwrap_or(existing.features),
            popular: self.popular.unwrap_or(existing.popular),
        }
    }
}

// ============================================================================
// ContactMessage
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContactMessage {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
}

impl NewContactMessage {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_min_chars(&mut errors, "name", "Name", &self.name, 2);
        require_email(&mut errors, "email", &self.email);
        require_min_chars(&mut errors, "subject", "Subject", &self.subject, 5);
        require_min_chars(&mut errors, "message", "Message", &self.message, 10);
        finish(errors)
    }
}

// ============================================================================
// SiteSettings (singleton, id fixed at 1)
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub id: i32,
    pub hero_title: String,
    pub hero_subtitle: String,
    pub about_description: String,
    pub email: String,
    pub phone: String,
    pub location: String,
    pub profile_photo: Option<String>,
    pub about_photo: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSiteSettings {
    pub hero_title: Option<String>,
    pub hero_subtitle: Option<String>,
    pub about_description: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub profile_photo: Option<String>,
    pub about_photo: Option<String>,
}

impl UpdateSiteSettings {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(hero_title) = &self.hero_title {
            require_text(&mut errors, "heroTitle", "Hero title", hero_title);
        }
        if let Some(hero_subtitle) = &self.hero_subtitle {
            require_text(&mut errors, "heroSubtitle", "Hero subtitle", hero_subtitle);
        }
        if let Some(about_description) = &self.about_description {
            require_text(
                &mut errors,
                "aboutDescription",
                "About description",
                about_description,
            );
        }
        if let Some(email) = &self.email {
            require_email(&mut errors, "email", email);
        }
        if let Some(phone) = &self.phone {
            require_text(&mut errors, "phone", "Phone", phone);
        }
        if let Some(location) = &self.location {
            require_text(&mut errors, "location", "Location", location);
        }
        finish(errors)
    }

    /// Merge onto the singleton row; the id is never touched.
    pub fn apply(self, existing: SiteSettings) -> SiteSettings {
        SiteSettings {
            id: existing.id,
            hero_title: self.hero_title.unwrap_or(existing.hero_title),
            hero_subtitle: self.hero_subtitle.unwrap_or(existing.hero_subtitle),
            about_description: self
                .about_description
                .unwrap_or(existing.about_description),
            email: self.email.unwrap_or(existing.email),
            phone: self.phone.unwrap_or(existing.phone),
            location: self.location.unwrap_or(existing.location),
            profile_photo: self.profile_photo.or(existing.profile_photo),
            about_photo: self.about_photo.or(existing.about_photo),
        }
    }
}

// ============================================================================
// SocialLink (upsert keyed by case-insensitive name)
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: i32,
    pub name: String,
    pub icon: String,
    pub url: String,
    #[serde(rename = "order")]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSocialLink {
    pub name: String,
    pub icon: String,
    pub url: String,
    #[serde(rename = "order", default)]
    pub sort_order: i32,
}

impl NewSocialLink {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_text(&mut errors, "name", "Name", &self.name);
        require_text(&mut errors, "icon", "Icon", &self.icon);
        require_text(&mut errors, "url", "Url", &self.url);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSocialLink {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "order")]
    pub sort_order: Option<i32>,
}

impl UpdateSocialLink {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(name) = &self.name {
            require_text(&mut errors, "name", "Name", name);
        }
        if let Some(icon) = &self.icon {
            require_text(&mut errors, "icon", "Icon", icon);
        }
        if let Some(url) = &self.url {
            require_text(&mut errors, "url", "Url", url);
        }
        finish(errors)
    }

    pub fn apply(self, existing: SocialLink) -> SocialLink {
        SocialLink {
            id: existing.id,
            name: self.name.unwrap_or(existing.name),
            icon: self.icon.unwrap_or(existing.icon),
            url: self.url.unwrap_or(existing.url),
            sort_order: self.sort_order.unwrap_or(existing.sort_order),
        }
    }
}

// ============================================================================
// Article
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub content: String,
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewArticle {
    pub title: String,
    pub summary: String,
    pub content: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl NewArticle {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_text(&mut errors, "title", "Title", &self.title);
        require_text(&mut errors, "summary", "Summary", &self.summary);
        require_text(&mut errors, "content", "Content", &self.content);
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateArticle {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub image: Option<String>,
}

impl UpdateArticle {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(title) = &self.title {
            require_text(&mut errors, "title", "Title", title);
        }
        if let Some(summary) = &self.summary {
            require_text(&mut errors, "summary", "Summary", summary);
        }
        if let Some(content) = &self.content {
            require_text(&mut errors, "content", "Content", content);
        }
        finish(errors)
    }

    pub fn apply(self, existing: Article) -> Article {
        Article {
            id: existing.id,
            title: self.title.unwrap_or(existing.title),
            summary: self.summary.unwrap_or(existing.summary),
            content: self.content.unwrap_or(existing.content),
            image: self.image.or(existing.image),
            created_at: existing.created_at,
        }
    }
}

// ============================================================================
// Education
// ============================================================================

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub id: i32,
    pub degree: String,
    pub school: String,
    pub year_start: i32,
    pub year_end: i32,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEducation {
    pub degree: String,
    pub school: String,
    pub year_start: i32,
    pub year_end: i32,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewEducation {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        require_text(&mut errors, "degree", "Degree", &self.degree);
        require_text(&mut errors, "school", "School", &self.school);
        if self.year_start <= 0 {
            errors.insert("yearStart", "Start year must be a positive year".to_string());
        }
        if self.year_end < self.year_start {
            errors.insert(
                "yearEnd",
                "End year must not be before the start year".to_string(),
            );
        }
        finish(errors)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEducation {
    pub degree: Option<String>,
    pub school: Option<String>,
    pub year_start: Option<i32>,
    pub year_end: Option<i32>,
    pub description: Option<String>,
}

impl UpdateEducation {
    pub fn validate(&self) -> Result<(), ApiError> {
        let mut errors = BTreeMap::new();
        if let Some(degree) = &self.degree {
            require_text(&mut errors, "degree", "Degree", degree);
        }
        if let Some(school) = &self.school {
            require_text(&mut errors, "school", "School", school);
        }
        if let Some(year_start) = self.year_start {
            if year_start <= 0 {
                errors.insert("yearStart", "Start year must be a positive year".to_string());
            }
        }
        if let (Some(year_start), Some(year_end)) = (self.year_start, self.year_end) {
            if year_end < year_start {
                errors.insert(
                    "yearEnd",
                    "End year must not be before the start year".to_string(),
                );
            }
        }
        // When only one year is supplied, ordering is checked against the
        // stored record after the merge.
        finish(errors)
    }

    pub fn apply(self, existing: Education) -> Education {
        Education {
            id: existing.id,
            degree: self.degree.unwrap_or(existing.degree),
            school: self.school.unwrap_or(existing.school),
            year_start: self.year_start.unwrap_or(existing.year_start),
            year_end: self.year_end.unwrap_or(existing.year_end),
            description: self.description.or(existing.description),
        }
    }
}
