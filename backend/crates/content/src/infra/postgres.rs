//! PostgreSQL Repository Implementations

use sqlx::PgPool;

use crate::domain::{
    EntityId, EntityRepository, ImageRef, ManagementMember, ManagementMemberFields, Project,
    ProjectFields, Sponsor, SponsorFields, Team, TeamFields,
};
use crate::error::ContentResult;

/// PostgreSQL-backed content repository
#[derive(Clone)]
pub struct PgContentRepository {
    pool: PgPool,
}

impl PgContentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Sponsors
// ============================================================================

#[derive(sqlx::FromRow)]
struct SponsorRow {
    id: i64,
    image: String,
    name: String,
    url: Option<String>,
}

impl SponsorRow {
    fn into_sponsor(self) -> Sponsor {
        Sponsor {
            id: EntityId::new(self.id),
            image: ImageRef::from_db(self.image),
            name: self.name,
            website_url: self.url,
        }
    }
}

impl EntityRepository<Sponsor> for PgContentRepository {
    async fn create(
        &self,
        fields: &SponsorFields,
        image: Option<&ImageRef>,
    ) -> ContentResult<EntityId<Sponsor>> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO sponsors (image, name, url) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(image.map(ImageRef::as_str))
        .bind(&fields.name)
        .bind(fields.website_url.as_deref())
        .fetch_one(&self.pool)
        .await?;

        Ok(EntityId::new(id))
    }

    async fn get(&self, id: EntityId<Sponsor>) -> ContentResult<Option<Sponsor>> {
        let row = sqlx::query_as::<_, SponsorRow>(
            "SELECT id, image, name, url FROM sponsors WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SponsorRow::into_sponsor))
    }

    async fn list(&self) -> ContentResult<Vec<Sponsor>> {
        let rows = sqlx::query_as::<_, SponsorRow>(
            "SELECT id, image, name, url FROM sponsors ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(SponsorRow::into_sponsor).collect())
    }

    async fn update(
        &self,
        id: EntityId<Sponsor>,
        fields: &SponsorFields,
        image: Option<&ImageRef>,
    ) -> ContentResult<Option<Sponsor>> {
        let row = sqlx::query_as::<_, SponsorRow>(
            r#"
            UPDATE sponsors
            SET name = $2, url = $3, image = COALESCE($4, image)
            WHERE id = $1
            RETURNING id, image, name, url
            "#,
        )
        .bind(id.get())
        .bind(&fields.name)
        .bind(fields.website_url.as_deref())
        .bind(image.map(ImageRef::as_str))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SponsorRow::into_sponsor))
    }

    async fn delete(&self, id: EntityId<Sponsor>) -> ContentResult<Option<Sponsor>> {
        let row = sqlx::query_as::<_, SponsorRow>(
            "DELETE FROM sponsors WHERE id = $1 RETURNING id, image, name, url",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SponsorRow::into_sponsor))
    }
}

// ============================================================================
// Management
// ============================================================================

#[derive(sqlx::FromRow)]
struct ManagementRow {
    id: i64,
    name: String,
    position: String,
    sort_order: i32,
}

impl ManagementRow {
    fn into_member(self) -> ManagementMember {
        ManagementMember {
            id: EntityId::new(self.id),
            name: self.name,
            position: self.position,
            order: self.sort_order,
        }
    }
}

impl EntityRepository<ManagementMember> for PgContentRepository {
    async fn create(
        &self,
        fields: &ManagementMemberFields,
        _image: Option<&ImageRef>,
    ) -> ContentResult<EntityId<ManagementMember>> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO management (name, position, sort_order) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(&fields.name)
        .bind(&fields.position)
        .bind(fields.order)
        .fetch_one(&self.pool)
        .await?;

        Ok(EntityId::new(id))
    }

    async fn get(&self, id: EntityId<ManagementMember>) -> ContentResult<Option<ManagementMember>> {
        let row = sqlx::query_as::<_, ManagementRow>(
            "SELECT id, name, position, sort_order FROM management WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ManagementRow::into_member))
    }

    async fn list(&self) -> ContentResult<Vec<ManagementMember>> {
        let rows = sqlx::query_as::<_, ManagementRow>(
            "SELECT id, name, position, sort_order FROM management ORDER BY sort_order, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ManagementRow::into_member).collect())
    }

    async fn update(
        &self,
        id: EntityId<ManagementMember>,
        fields: &ManagementMemberFields,
        _image: Option<&ImageRef>,
    ) -> ContentResult<Option<ManagementMember>> {
        let row = sqlx::query_as::<_, ManagementRow>(
            r#"
            UPDATE management
            SET name = $2, position = $3, sort_order = $4
            WHERE id = $1
            RETURNING id, name, position, sort_order
            "#,
        )
        .bind(id.get())
        .bind(&fields.name)
        .bind(&fields.position)
        .bind(fields.order)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ManagementRow::into_member))
    }

    async fn delete(
        &self,
        id: EntityId<ManagementMember>,
    ) -> ContentResult<Option<ManagementMember>> {
        let row = sqlx::query_as::<_, ManagementRow>(
            "DELETE FROM management WHERE id = $1 RETURNING id, name, position, sort_order",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ManagementRow::into_member))
    }
}

// ============================================================================
// Teams
// ============================================================================

#[derive(sqlx::FromRow)]
struct TeamRow {
    id: i64,
    name: String,
    image: String,
    vintage: String,
    trainer: String,
    trainer_phone: Option<String>,
    sort_order: i32,
}

impl TeamRow {
    fn into_team(self) -> Team {
        Team {
            id: EntityId::new(self.id),
            name: self.name,
            image: ImageRef::from_db(self.image),
            vintage: self.vintage,
            trainer: self.trainer,
            trainer_phone: self.trainer_phone,
            order: self.sort_order,
        }
    }
}

const TEAM_COLUMNS: &str = "id, name, image, vintage, trainer, trainer_phone, sort_order";

impl EntityRepository<Team> for PgContentRepository {
    async fn create(
        &self,
        fields: &TeamFields,
        image: Option<&ImageRef>,
    ) -> ContentResult<EntityId<Team>> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO teams (name, image, vintage, trainer, trainer_phone, sort_order)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&fields.name)
        .bind(image.map(ImageRef::as_str))
        .bind(&fields.vintage)
        .bind(&fields.trainer)
        .bind(fields.trainer_phone.as_deref())
        .bind(fields.order)
        .fetch_one(&self.pool)
        .await?;

        Ok(EntityId::new(id))
    }

    async fn get(&self, id: EntityId<Team>) -> ContentResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams WHERE id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TeamRow::into_team))
    }

    async fn list(&self) -> ContentResult<Vec<Team>> {
        let rows = sqlx::query_as::<_, TeamRow>(&format!(
            "SELECT {TEAM_COLUMNS} FROM teams ORDER BY sort_order, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(TeamRow::into_team).collect())
    }

    async fn update(
        &self,
        id: EntityId<Team>,
        fields: &TeamFields,
        image: Option<&ImageRef>,
    ) -> ContentResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            r#"
            UPDATE teams
            SET name = $2, vintage = $3, trainer = $4, trainer_phone = $5,
                sort_order = $6, image = COALESCE($7, image)
            WHERE id = $1
            RETURNING {TEAM_COLUMNS}
            "#
        ))
        .bind(id.get())
        .bind(&fields.name)
        .bind(&fields.vintage)
        .bind(&fields.trainer)
        .bind(fields.trainer_phone.as_deref())
        .bind(fields.order)
        .bind(image.map(ImageRef::as_str))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TeamRow::into_team))
    }

    async fn delete(&self, id: EntityId<Team>) -> ContentResult<Option<Team>> {
        let row = sqlx::query_as::<_, TeamRow>(&format!(
            "DELETE FROM teams WHERE id = $1 RETURNING {TEAM_COLUMNS}"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(TeamRow::into_team))
    }
}

// ============================================================================
// Projects
// ============================================================================

#[derive(sqlx::FromRow)]
struct ProjectRow {
    id: i64,
    image: String,
    name: String,
    description: String,
}

impl ProjectRow {
    fn into_project(self) -> Project {
        Project {
            id: EntityId::new(self.id),
            image: ImageRef::from_db(self.image),
            name: self.name,
            description: self.description,
        }
    }
}

impl EntityRepository<Project> for PgContentRepository {
    async fn create(
        &self,
        fields: &ProjectFields,
        image: Option<&ImageRef>,
    ) -> ContentResult<EntityId<Project>> {
        let id: i64 = sqlx::query_scalar(
            "INSERT INTO projects (image, name, description) VALUES ($1, $2, $3) RETURNING id",
        )
        .bind(image.map(ImageRef::as_str))
        .bind(&fields.name)
        .bind(&fields.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(EntityId::new(id))
    }

    async fn get(&self, id: EntityId<Project>) -> ContentResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, image, name, description FROM projects WHERE id = $1",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProjectRow::into_project))
    }

    async fn list(&self) -> ContentResult<Vec<Project>> {
        let rows = sqlx::query_as::<_, ProjectRow>(
            "SELECT id, image, name, description FROM projects ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProjectRow::into_project).collect())
    }

    async fn update(
        &self,
        id: EntityId<Project>,
        fields: &ProjectFields,
        image: Option<&ImageRef>,
    ) -> ContentResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            r#"
            UPDATE projects
            SET name = $2, description = $3, image = COALESCE($4, image)
            WHERE id = $1
            RETURNING id, image, name, description
            "#,
        )
        .bind(id.get())
        .bind(&fields.name)
        .bind(&fields.description)
        .bind(image.map(ImageRef::as_str))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProjectRow::into_project))
    }

    async fn delete(&self, id: EntityId<Project>) -> ContentResult<Option<Project>> {
        let row = sqlx::query_as::<_, ProjectRow>(
            "DELETE FROM projects WHERE id = $1 RETURNING id, image, name, description",
        )
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProjectRow::into_project))
    }
}
