//! Domain Entities
//!
//! The four kinds of club content. Each entity is a stored record plus a
//! `*Fields` struct holding everything an admin form can set except the
//! image, which travels separately as an [`ImageRef`].

use serde::Serialize;

use crate::domain::value_objects::{EntityId, ImageRef};

/// Kind of content record, used for routes, logs and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Sponsor,
    Management,
    Team,
    Project,
}

impl EntityKind {
    /// Path segment in `/add-<slug>`, `/edit-<slug>/{id}`, `/delete-<slug>/{id}`
    pub fn slug(&self) -> &'static str {
        match self {
            EntityKind::Sponsor => "sponsor",
            EntityKind::Management => "management",
            EntityKind::Team => "team",
            EntityKind::Project => "project",
        }
    }

    /// Human name used in flash messages
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Sponsor => "Sponsor",
            EntityKind::Management => "Management member",
            EntityKind::Team => "Team",
            EntityKind::Project => "Project",
        }
    }

    /// Page the admin returns to after a change
    ///
    /// Sponsors are shown in the footer of every page, so they go home.
    pub fn listing_path(&self) -> &'static str {
        match self {
            EntityKind::Sponsor => "/",
            EntityKind::Management => "/management",
            EntityKind::Team => "/teams",
            EntityKind::Project => "/projects",
        }
    }

    pub fn has_image(&self) -> bool {
        !matches!(self, EntityKind::Management)
    }
}

/// Behaviour shared by every content record
pub trait Entity: Clone + Serialize + Send + Sync + 'static {
    type Fields: Clone + Send + Sync + 'static;

    const KIND: EntityKind;

    fn id(&self) -> EntityId<Self>;

    /// Stored image, `None` for kinds without one
    fn image(&self) -> Option<&ImageRef>;

    fn fields(&self) -> Self::Fields;

    /// Overwrite every field; the image only when a new one is given
    fn apply(&mut self, fields: Self::Fields, image: Option<ImageRef>);

    /// Explicit listing position; `None` lists by id
    fn display_order(&self) -> Option<i32> {
        None
    }
}

/// Listing order: by `display_order` where present, ties broken by id
pub fn sort_for_listing<E: Entity>(items: &mut [E]) {
    items.sort_by_key(|item| (item.display_order().unwrap_or(0), item.id()));
}

// ============================================================================
// Sponsor
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sponsor {
    pub id: EntityId<Sponsor>,
    pub image: ImageRef,
    pub name: String,
    pub website_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SponsorFields {
    pub name: String,
    pub website_url: Option<String>,
}

impl Sponsor {
    pub fn new(id: EntityId<Sponsor>, fields: SponsorFields, image: ImageRef) -> Self {
        Self {
            id,
            image,
            name: fields.name,
            website_url: fields.website_url,
        }
    }
}

impl Entity for Sponsor {
    type Fields = SponsorFields;

    const KIND: EntityKind = EntityKind::Sponsor;

    fn id(&self) -> EntityId<Self> {
        self.id
    }

    fn image(&self) -> Option<&ImageRef> {
        Some(&self.image)
    }

    fn fields(&self) -> SponsorFields {
        SponsorFields {
            name: self.name.clone(),
            website_url: self.website_url.clone(),
        }
    }

    fn apply(&mut self, fields: SponsorFields, image: Option<ImageRef>) {
        self.name = fields.name;
        self.website_url = fields.website_url;
        if let Some(image) = image {
            self.image = image;
        }
    }
}

// ============================================================================
// ManagementMember
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManagementMember {
    pub id: EntityId<ManagementMember>,
    pub name: String,
    pub position: String,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManagementMemberFields {
    pub name: String,
    pub position: String,
    pub order: i32,
}

impl ManagementMember {
    pub fn new(id: EntityId<ManagementMember>, fields: ManagementMemberFields) -> Self {
        Self {
            id,
            name: fields.name,
            position: fields.position,
            order: fields.order,
        }
    }
}

impl Entity for ManagementMember {
    type Fields = ManagementMemberFields;

    const KIND: EntityKind = EntityKind::Management;

    fn id(&self) -> EntityId<Self> {
        self.id
    }

    fn image(&self) -> Option<&ImageRef> {
        None
    }

    fn fields(&self) -> ManagementMemberFields {
        ManagementMemberFields {
            name: self.name.clone(),
            position: self.position.clone(),
            order: self.order,
        }
    }

    fn apply(&mut self, fields: ManagementMemberFields, _image: Option<ImageRef>) {
        self.name = fields.name;
        self.position = fields.position;
        self.order = fields.order;
    }

    fn display_order(&self) -> Option<i32> {
        Some(self.order)
    }
}

// ============================================================================
// Team
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Team {
    pub id: EntityId<Team>,
    pub name: String,
    pub image: ImageRef,
    pub vintage: String,
    pub trainer: String,
    pub trainer_phone: Option<String>,
    pub order: i32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamFields {
    pub name: String,
    pub vintage: String,
    pub trainer: String,
    pub trainer_phone: Option<String>,
    pub order: i32,
}

impl Team {
    pub fn new(id: EntityId<Team>, fields: TeamFields, image: ImageRef) -> Self {
        Self {
            id,
            name: fields.name,
            image,
            vintage: fields.vintage,
            trainer: fields.trainer,
            trainer_phone: fields.trainer_phone,
            order: fields.order,
        }
    }
}

impl Entity for Team {
    type Fields = TeamFields;

    const KIND: EntityKind = EntityKind::Team;

    fn id(&self) -> EntityId<Self> {
        self.id
    }

    fn image(&self) -> Option<&ImageRef> {
        Some(&self.image)
    }

    fn fields(&self) -> TeamFields {
        TeamFields {
            name: self.name.clone(),
            vintage: self.vintage.clone(),
            trainer: self.trainer.clone(),
            trainer_phone: self.trainer_phone.clone(),
            order: self.order,
        }
    }

    fn apply(&mut self, fields: TeamFields, image: Option<ImageRef>) {
        self.name = fields.name;
        self.vintage = fields.vintage;
        self.trainer = fields.trainer;
        self.trainer_phone = fields.trainer_phone;
        self.order = fields.order;
        if let Some(image) = image {
            self.image = image;
        }
    }

    fn display_order(&self) -> Option<i32> {
        Some(self.order)
    }
}

// ============================================================================
// Project
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Project {
    pub id: EntityId<Project>,
    pub image: ImageRef,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectFields {
    pub name: String,
    pub description: String,
}

impl Project {
    pub fn new(id: EntityId<Project>, fields: ProjectFields, image: ImageRef) -> Self {
        Self {
            id,
            image,
            name: fields.name,
            description: fields.description,
        }
    }
}

impl Entity for Project {
    type Fields = ProjectFields;

    const KIND: EntityKind = EntityKind::Project;

    fn id(&self) -> EntityId<Self> {
        self.id
    }

    fn image(&self) -> Option<&ImageRef> {
        Some(&self.image)
    }

    fn fields(&self) -> ProjectFields {
        ProjectFields {
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    fn apply(&mut self, fields: ProjectFields, image: Option<ImageRef>) {
        self.name = fields.name;
        self.description = fields.description;
        if let Some(image) = image {
            self.image = image;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(id: i64, order: i32) -> ManagementMember {
        ManagementMember::new(
            EntityId::new(id),
            ManagementMemberFields {
                name: format!("Member {id}"),
                position: "Board".to_string(),
                order,
            },
        )
    }

    #[test]
    fn test_listing_sorted_by_order_then_id() {
        let mut members = vec![member(1, 5), member(2, 1), member(3, 5), member(4, -2)];
        sort_for_listing(&mut members);
        let ids: Vec<i64> = members.iter().map(|m| m.id.get()).collect();
        assert_eq!(ids, [4, 2, 1, 3]);
    }

    #[test]
    fn test_apply_without_image_keeps_reference() {
        let image = ImageRef::parse("0123456789ab_a.png").unwrap();
        let mut team = Team::new(
            EntityId::new(1),
            TeamFields {
                name: "U12".to_string(),
                vintage: "2014".to_string(),
                trainer: "Kim".to_string(),
                trainer_phone: None,
                order: 1,
            },
            image.clone(),
        );

        let mut fields = team.fields();
        fields.trainer = "Lee".to_string();
        team.apply(fields, None);

        assert_eq!(team.trainer, "Lee");
        assert_eq!(team.image, image);
    }

    #[test]
    fn test_kind_routes() {
        assert_eq!(EntityKind::Sponsor.listing_path(), "/");
        assert_eq!(EntityKind::Management.slug(), "management");
        assert!(!EntityKind::Management.has_image());
        assert!(EntityKind::Project.has_image());
    }

    #[test]
    fn test_sponsor_serializes_for_pages() {
        let sponsor = Sponsor::new(
            EntityId::new(9),
            SponsorFields {
                name: "Acme".to_string(),
                website_url: Some("https://acme.example".to_string()),
            },
            ImageRef::parse("0123456789ab_logo.png").unwrap(),
        );
        let value = serde_json::to_value(&sponsor).unwrap();
        assert_eq!(value["id"], 9);
        assert_eq!(value["image"], "0123456789ab_logo.png");
        assert_eq!(value["website_url"], "https://acme.example");
    }
}
