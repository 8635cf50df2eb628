/**
 * Storage Layer
 * One function per logical operation against the relational store.
 * Each operation issues a single statement; partial updates merge the
 * patch onto the stored row in Rust and write the whole row back.
 */
use std::collections::BTreeMap;

use sqlx::PgPool;

use crate::db::models::{
    Activity, Article, ContactMessage, Education, NewActivity, NewArticle, NewContactMessage,
    NewEducation, NewPricingPlan, NewProject, NewSkill, NewSocialLink, PricingPlan, Project,
    SiteSettings, Skill, SocialLink, UpdateActivity, UpdateArticle, UpdateEducation,
    UpdatePricingPlan, UpdateProject, UpdateSiteSettings, UpdateSkill, UpdateSocialLink, User,
};
use crate::error::ApiError;

// ============================================================================
// Users
// ============================================================================

pub async fn get_user_by_username(pool: &PgPool, username: &str) -> sqlx::Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT id, username, password_hash FROM users WHERE LOWER(username) = LOWER($1)",
    )
    .bind(username)
    .fetch_optional(pool)
    .await
}

pub async fn count_users(pool: &PgPool) -> sqlx::Result<i64> {
    let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(row.0)
}

pub async fn create_user(pool: &PgPool, username: &str, password_hash: &str) -> sqlx::Result<User> {
    sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users (username, password_hash)
        VALUES ($1, $2)
        RETURNING id, username, password_hash
        "#,
    )
    .bind(username)
    .bind(password_hash)
    .fetch_one(pool)
    .await
}

// ============================================================================
// Projects
// ============================================================================

pub async fn list_projects(pool: &PgPool) -> sqlx::Result<Vec<Project>> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, title, description, image, technologies, live_url, github_url, featured, created_at
        FROM projects
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_project(pool: &PgPool, id: i32) -> sqlx::Result<Option<Project>> {
    sqlx::query_as::<_, Project>(
        r#"
        SELECT id, title, description, image, technologies, live_url, github_url, featured, created_at
        FROM projects
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_project(pool: &PgPool, new: &NewProject) -> sqlx::Result<Project> {
    sqlx::query_as::<_, Project>(
        r#"
        INSERT INTO projects (title, description, image, technologies, live_url, github_url, featured)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING id, title, description, image, technologies, live_url, github_url, featured, created_at
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.image)
    .bind(&new.technologies)
    .bind(&new.live_url)
    .bind(&new.github_url)
    .bind(new.featured)
    .fetch_one(pool)
    .await
}

/// Returns `None` when the id does not exist.
pub async fn update_project(
    pool: &PgPool,
    id: i32,
    patch: UpdateProject,
) -> sqlx::Result<Option<Project>> {
    let Some(existing) = get_project(pool, id).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    let project = sqlx::query_as::<_, Project>(
        r#"
        UPDATE projects
        SET title = $1, description = $2, image = $3, technologies = $4,
            live_url = $5, github_url = $6, featured = $7
        WHERE id = $8
        RETURNING id, title, description, image, technologies, live_url, github_url, featured, created_at
        "#,
    )
    .bind(&merged.title)
    .bind(&merged.description)
    .bind(&merged.image)
    .bind(&merged.technologies)
    .bind(&merged.live_url)
    .bind(&merged.github_url)
    .bind(merged.featured)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(project))
}

/// Idempotent: deleting a missing id succeeds and reports `false`.
pub async fn delete_project(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM projects WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Skills
// ============================================================================

pub async fn list_skills(pool: &PgPool, category: Option<&str>) -> sqlx::Result<Vec<Skill>> {
    match category {
        Some(category) => {
            sqlx::query_as::<_, Skill>(
                "SELECT id, name, category, level, icon FROM skills WHERE category = $1 ORDER BY id ASC",
            )
            .bind(category)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Skill>(
                "SELECT id, name, category, level, icon FROM skills ORDER BY id ASC",
            )
            .fetch_all(pool)
            .await
        }
    }
}

pub async fn get_skill(pool: &PgPool, id: i32) -> sqlx::Result<Option<Skill>> {
    sqlx::query_as::<_, Skill>("SELECT id, name, category, level, icon FROM skills WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create_skill(pool: &PgPool, new: &NewSkill) -> sqlx::Result<Skill> {
    sqlx::query_as::<_, Skill>(
        r#"
        INSERT INTO skills (name, category, level, icon)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, category, level, icon
        "#,
    )
    .bind(&new.name)
    .bind(&new.category)
    .bind(new.level)
    .bind(&new.icon)
    .fetch_one(pool)
    .await
}

pub async fn update_skill(pool: &PgPool, id: i32, patch: UpdateSkill) -> sqlx::Result<Option<Skill>> {
    let Some(existing) = get_skill(pool, id).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    let skill = sqlx::query_as::<_, Skill>(
        r#"
        UPDATE skills
        SET name = $1, category = $2, level = $3, icon = $4
        WHERE id = $5
        RETURNING id, name, category, level, icon
        "#,
    )
    .bind(&merged.name)
    .bind(&merged.category)
    .bind(merged.level)
    .bind(&merged.icon)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(skill))
}

pub async fn delete_skill(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM skills WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Activities
// ============================================================================

pub async fn list_activities(pool: &PgPool) -> sqlx::Result<Vec<Activity>> {
    sqlx::query_as::<_, Activity>(
        "SELECT id, title, description, frequency, icon, active FROM activities ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_activity(pool: &PgPool, id: i32) -> sqlx::Result<Option<Activity>> {
    sqlx::query_as::<_, Activity>(
        "SELECT id, title, description, frequency, icon, active FROM activities WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_activity(pool: &PgPool, new: &NewActivity) -> sqlx::Result<Activity> {
    sqlx::query_as::<_, Activity>(
        r#"
        INSERT INTO activities (title, description, frequency, icon, active)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, title, description, frequency, icon, active
        "#,
    )
    .bind(&new.title)
    .bind(&new.description)
    .bind(&new.frequency)
    .bind(&new.icon)
    .bind(new.active)
    .fetch_one(pool)
    .await
}

pub async fn update_activity(
    pool: &PgPool,
    id: i32,
    patch: UpdateActivity,
) -> sqlx::Result<Option<Activity>> {
    let Some(existing) = get_activity(pool, id).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    let activity = sqlx::query_as::<_, Activity>(
        r#"
        UPDATE activities
        SET title = $1, description = $2, frequency = $3, icon = $4, active = $5
        WHERE id = $6
        RETURNING id, title, description, frequency, icon, active
        "#,
    )
    .bind(&merged.title)
    .bind(&merged.description)
    .bind(&merged.frequency)
    .bind(&merged.icon)
    .bind(merged.active)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(activity))
}

pub async fn delete_activity(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM activities WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Pricing plans
// ============================================================================

pub async fn list_pricing_plans(pool: &PgPool) -> sqlx::Result<Vec<PricingPlan>> {
    sqlx::query_as::<_, PricingPlan>(
        "SELECT id, name, price, duration, features, popular FROM pricing_plans ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_pricing_plan(pool: &PgPool, id: i32) -> sqlx::Result<Option<PricingPlan>> {
    sqlx::query_as::<_, PricingPlan>(
        "SELECT id, name, price, duration, features, popular FROM pricing_plans WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_pricing_plan(pool: &PgPool, new: &NewPricingPlan) -> sqlx::Result<PricingPlan> {
    sqlx::query_as::<_, PricingPlan>(
        r#"
        INSERT INTO pricing_plans (name, price, duration, features, popular)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, name, price, duration, features, popular
        "#,
    )
    .bind(&new.name)
    .bind(new.price)
    .bind(&new.duration)
    .bind(&new.features)
    .bind(new.popular)
    .fetch_one(pool)
    .await
}

pub async fn update_pricing_plan(
    pool: &PgPool,
    id: i32,
    patch: UpdatePricingPlan,
) -> sqlx::Result<Option<PricingPlan>> {
    let Some(existing) = get_pricing_plan(pool, id).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    let plan = sqlx::query_as::<_, PricingPlan>(
        r#"
        UPDATE pricing_plans
        SET name = $1, price = $2, duration = $3, features = $4, popular = $5
        WHERE id = $6
        RETURNING id, name, price, duration, features, popular
        "#,
    )
    .bind(&merged.name)
    .bind(merged.price)
    .bind(&merged.duration)
    .bind(&merged.features)
    .bind(merged.popular)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(plan))
}

pub async fn delete_pricing_plan(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM pricing_plans WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Contact messages
// ============================================================================

pub async fn list_contact_messages(pool: &PgPool) -> sqlx::Result<Vec<ContactMessage>> {
    sqlx::query_as::<_, ContactMessage>(
        r#"
        SELECT id, name, email, subject, message, read, created_at
        FROM contact_messages
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn create_contact_message(
    pool: &PgPool,
    new: &NewContactMessage,
) -> sqlx::Result<ContactMessage> {
    sqlx::query_as::<_, ContactMessage>(
        r#"
        INSERT INTO contact_messages (name, email, subject, message)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, email, subject, message, read, created_at
        "#,
    )
    .bind(new.name.trim())
    .bind(new.email.trim())
    .bind(new.subject.trim())
    .bind(new.message.trim())
    .fetch_one(pool)
    .await
}

/// The only exposed transition for `read` is false -> true.
pub async fn mark_message_read(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("UPDATE contact_messages SET read = true WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn delete_contact_message(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM contact_messages WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Site settings (singleton row, id = 1)
// ============================================================================

pub async fn get_site_settings(pool: &PgPool) -> sqlx::Result<Option<SiteSettings>> {
    sqlx::query_as::<_, SiteSettings>(
        r#"
        SELECT id, hero_title, hero_subtitle, about_description, email, phone, location, profile_photo, about_photo
        FROM site_settings
        WHERE id = 1
        "#,
    )
    .fetch_optional(pool)
    .await
}

/// Partial merge onto the singleton row. Never inserts; the row is seeded
/// by the migrations. Returns `None` only if the seed row is missing.
pub async fn update_site_settings(
    pool: &PgPool,
    patch: UpdateSiteSettings,
) -> sqlx::Result<Option<SiteSettings>> {
    let Some(existing) = get_site_settings(pool).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    let settings = sqlx::query_as::<_, SiteSettings>(
        r#"
        UPDATE site_settings
        SET hero_title = $1, hero_subtitle = $2, about_description = $3,
            email = $4, phone = $5, location = $6, profile_photo = $7, about_photo = $8
        WHERE id = 1
        RETURNING id, hero_title, hero_subtitle, about_description, email, phone, location, profile_photo, about_photo
        "#,
    )
    .bind(&merged.hero_title)
    .bind(&merged.hero_subtitle)
    .bind(&merged.about_description)
    .bind(&merged.email)
    .bind(&merged.phone)
    .bind(&merged.location)
    .bind(&merged.profile_photo)
    .bind(&merged.about_photo)
    .fetch_one(pool)
    .await?;

    Ok(Some(settings))
}

// ============================================================================
// Social links
// ============================================================================

pub async fn list_social_links(pool: &PgPool) -> sqlx::Result<Vec<SocialLink>> {
    sqlx::query_as::<_, SocialLink>(
        "SELECT id, name, icon, url, sort_order FROM social_links ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_social_link(pool: &PgPool, id: i32) -> sqlx::Result<Option<SocialLink>> {
    sqlx::query_as::<_, SocialLink>(
        "SELECT id, name, icon, url, sort_order FROM social_links WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Create-or-replace keyed by case-insensitive name, as one conditional
/// write so concurrent submissions of the same name cannot race.
pub async fn upsert_social_link(pool: &PgPool, new: &NewSocialLink) -> sqlx::Result<SocialLink> {
    sqlx::query_as::<_, SocialLink>(
        r#"
        INSERT INTO social_links (name, icon, url, sort_order)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (LOWER(name)) DO UPDATE SET
            name = EXCLUDED.name,
            icon = EXCLUDED.icon,
            url = EXCLUDED.url,
            sort_order = EXCLUDED.sort_order
        RETURNING id, name, icon, url, sort_order
        "#,
    )
    .bind(&new.name)
    .bind(&new.icon)
    .bind(&new.url)
    .bind(new.sort_order)
    .fetch_one(pool)
    .await
}

pub async fn update_social_link(
    pool: &PgPool,
    id: i32,
    patch: UpdateSocialLink,
) -> sqlx::Result<Option<SocialLink>> {
    let Some(existing) = get_social_link(pool, id).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    let link = sqlx::query_as::<_, SocialLink>(
        r#"
        UPDATE social_links
        SET name = $1, icon = $2, url = $3, sort_order = $4
        WHERE id = $5
        RETURNING id, name, icon, url, sort_order
        "#,
    )
    .bind(&merged.name)
    .bind(&merged.icon)
    .bind(&merged.url)
    .bind(merged.sort_order)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(link))
}

pub async fn delete_social_link(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM social_links WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Articles
// ============================================================================

pub async fn list_articles(pool: &PgPool) -> sqlx::Result<Vec<Article>> {
    sqlx::query_as::<_, Article>(
        r#"
        SELECT id, title, summary, content, image, created_at
        FROM articles
        ORDER BY created_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn get_article(pool: &PgPool, id: i32) -> sqlx::Result<Option<Article>> {
    sqlx::query_as::<_, Article>(
        "SELECT id, title, summary, content, image, created_at FROM articles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_article(pool: &PgPool, new: &NewArticle) -> sqlx::Result<Article> {
    sqlx::query_as::<_, Article>(
        r#"
        INSERT INTO articles (title, summary, content, image)
        VALUES ($1, $2, $3, $4)
        RETURNING id, title, summary, content, image, created_at
        "#,
    )
    .bind(&new.title)
    .bind(&new.summary)
    .bind(&new.content)
    .bind(&new.image)
    .fetch_one(pool)
    .await
}

pub async fn update_article(
    pool: &PgPool,
    id: i32,
    patch: UpdateArticle,
) -> sqlx::Result<Option<Article>> {
    let Some(existing) = get_article(pool, id).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    let article = sqlx::query_as::<_, Article>(
        r#"
        UPDATE articles
        SET title = $1, summary = $2, content = $3, image = $4
        WHERE id = $5
        RETURNING id, title, summary, content, image, created_at
        "#,
    )
    .bind(&merged.title)
    .bind(&merged.summary)
    .bind(&merged.content)
    .bind(&merged.image)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(article))
}

pub async fn delete_article(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM articles WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

// ============================================================================
// Education
// ============================================================================

pub async fn list_education(pool: &PgPool) -> sqlx::Result<Vec<Education>> {
    sqlx::query_as::<_, Education>(
        "SELECT id, degree, school, year_start, year_end, description FROM education ORDER BY id ASC",
    )
    .fetch_all(pool)
    .await
}

pub async fn get_education(pool: &PgPool, id: i32) -> sqlx::Result<Option<Education>> {
    sqlx::query_as::<_, Education>(
        "SELECT id, degree, school, year_start, year_end, description FROM education WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn create_education(pool: &PgPool, new: &NewEducation) -> sqlx::Result<Education> {
    sqlx::query_as::<_, Education>(
        r#"
        INSERT INTO education (degree, school, year_start, year_end, description)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, degree, school, year_start, year_end, description
        "#,
    )
    .bind(&new.degree)
    .bind(&new.school)
    .bind(new.year_start)
    .bind(new.year_end)
    .bind(&new.description)
    .fetch_one(pool)
    .await
}

pub async fn update_education(
    pool: &PgPool,
    id: i32,
    patch: UpdateEducation,
) -> Result<Option<Education>, ApiError> {
    let Some(existing) = get_education(pool, id).await? else {
        return Ok(None);
    };
    let merged = patch.apply(existing);

    // The year pair can straddle patch and stored values, so the ordering
    // rule has to be checked on the merged record.
    if merged.year_end < merged.year_start {
        let mut errors = BTreeMap::new();
        errors.insert(
            "yearEnd",
            "End year must not be before the start year".to_string(),
        );
        return Err(ApiError::validation(errors));
    }

    let education = sqlx::query_as::<_, Education>(
        r#"
        UPDATE education
        SET degree = $1, school = $2, year_start = $3, year_end = $4, description = $5
        WHERE id = $6
        RETURNING id, degree, school, year_start, year_end, description
        "#,
    )
    .bind(&merged.degree)
    .bind(&merged.school)
    .bind(merged.year_start)
    .bind(merged.year_end)
    .bind(&merged.description)
    .bind(id)
    .fetch_one(pool)
    .await?;

    Ok(Some(education))
}

pub async fn delete_education(pool: &PgPool, id: i32) -> sqlx::Result<bool> {
    let result = sqlx::query("DELETE FROM education WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
