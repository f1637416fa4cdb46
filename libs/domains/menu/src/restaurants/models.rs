use chrono::{DateTime, NaiveTime, Utc};
use database::Record;
use regex::Regex;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use strum::{Display, EnumString};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::error::AggregateKind;
use crate::events::{AggregateRoot, EventAction, EventBuffer};

/// Lowercase words separated by single hyphens, e.g. `joes-diner`
pub static SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

/// One opening window, e.g. Friday 11:00 to 15:00
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OpeningHours {
    pub day: Weekday,
    #[schema(value_type = String, example = "11:00:00")]
    pub opening: NaiveTime,
    #[schema(value_type = String, example = "15:00:00")]
    pub closing: NaiveTime,
}

fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    if !SLUG.is_match(slug) {
        return Err(ValidationError::new("invalid_slug")
            .with_message("slug must be lowercase words separated by hyphens".into()));
    }
    Ok(())
}

fn validate_weekly_schedule(schedule: &[OpeningHours]) -> Result<(), ValidationError> {
    if schedule.iter().any(|hours| hours.closing <= hours.opening) {
        return Err(ValidationError::new("closing_before_opening")
            .with_message("closing time must be after opening time".into()));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default)]
pub struct DeliverySettings {
    pub enabled: bool,
    #[schema(value_type = String, example = "1.50")]
    pub fee_per_km: Decimal,
    #[schema(value_type = String, example = "25.00")]
    pub minimum_order_value: Decimal,
    #[schema(value_type = String, example = "8")]
    pub max_radius_km: Decimal,
    #[validate(range(max = 600))]
    pub average_time_minutes: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct EcommerceSettings {
    #[schema(value_type = String, example = "15.00")]
    pub minimum_order_value: Decimal,
    pub acquired: bool,
    pub acquired_at: Option<DateTime<Utc>>,
    pub online: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PostPaidSettings {
    pub acquired: bool,
    pub acquired_at: Option<DateTime<Utc>>,
    pub enabled: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
#[serde(default)]
pub struct Settings {
    pub show_tax_id_in_receipt: bool,
    #[validate(custom(function = "validate_weekly_schedule"))]
    pub weekly_schedule: Vec<OpeningHours>,
    #[validate(nested)]
    pub delivery: DeliverySettings,
    pub ecommerce: EcommerceSettings,
    pub post_paid: PostPaidSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema, Validate)]
pub struct Address {
    /// Short label such as "Main store"
    #[serde(default)]
    pub alias: String,
    #[validate(length(min = 1, max = 200))]
    pub street: String,
    #[validate(length(max = 20))]
    pub number: String,
    #[serde(default)]
    pub complement: Option<String>,
    pub neighborhood: String,
    #[validate(length(min = 1, max = 120))]
    pub city: String,
    #[validate(length(min = 1, max = 60))]
    pub state: String,
    #[validate(length(min = 2, max = 60))]
    pub country: String,
    #[validate(length(min = 1, max = 20))]
    pub zip_code: String,
    #[serde(default)]
    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: Option<f64>,
    #[serde(default)]
    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: Option<f64>,
}

impl Address {
    /// `Street, Number - Complement, Neighborhood, City - State, Zip, Country`
    pub fn one_line(&self) -> String {
        let mut line = format!("{}, {}", self.street, self.number);
        if let Some(complement) = self.complement.as_deref().filter(|c| !c.is_empty()) {
            line.push_str(" - ");
            line.push_str(complement);
        }
        if !self.neighborhood.is_empty() {
            line.push_str(", ");
            line.push_str(&self.neighborhood);
        }
        line.push_str(&format!(
            ", {} - {}, {}, {}",
            self.city, self.state, self.zip_code, self.country
        ));
        line
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Restaurant {
    pub id: Uuid,
    pub trade_name: String,
    pub legal_name: String,
    /// Unique among non-deleted restaurants
    pub tax_id: String,
    pub phone: String,
    pub whatsapp: String,
    pub email: String,
    /// Unique among non-deleted restaurants
    pub slug: String,
    pub address: Address,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub settings: Settings,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip)]
    pub(crate) events: EventBuffer,
}

impl Restaurant {
    pub fn new(input: CreateRestaurant) -> Self {
        let now = Utc::now();
        let mut restaurant = Self {
            id: Uuid::now_v7(),
            trade_name: input.trade_name,
            legal_name: input.legal_name,
            tax_id: input.tax_id,
            phone: input.phone,
            whatsapp: input.whatsapp,
            email: input.email,
            slug: input.slug,
            address: input.address,
            logo_url: None,
            banner_url: None,
            settings: input.settings,
            active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            events: EventBuffer::default(),
        };
        restaurant.raise(EventAction::Created);
        restaurant
    }

    pub fn apply_update(&mut self, update: UpdateRestaurant) {
        if let Some(trade_name) = update.trade_name {
            self.trade_name = trade_name;
        }
        if let Some(legal_name) = update.legal_name {
            self.legal_name = legal_name;
        }
        if let Some(tax_id) = update.tax_id {
            self.tax_id = tax_id;
        }
        if let Some(phone) = update.phone {
            self.phone = phone;
        }
        if let Some(whatsapp) = update.whatsapp {
            self.whatsapp = whatsapp;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(slug) = update.slug {
            self.slug = slug;
        }
        if let Some(address) = update.address {
            self.address = address;
        }
        if let Some(settings) = update.settings {
            self.settings = settings;
        }
        if let Some(active) = update.active {
            self.active = active;
        }
        self.touch();
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
        self.raise(EventAction::Updated);
    }

    pub fn summary(self) -> RestaurantSummary {
        RestaurantSummary {
            id: self.id,
            trade_name: self.trade_name,
            slug: self.slug,
            address: self.address.one_line(),
            logo_url: self.logo_url,
            banner_url: self.banner_url,
            active: self.active,
        }
    }
}

impl AggregateRoot for Restaurant {
    const KIND: AggregateKind = AggregateKind::Restaurant;

    fn id(&self) -> Uuid {
        self.id
    }

    fn events_mut(&mut self) -> &mut EventBuffer {
        &mut self.events
    }
}

impl Record for Restaurant {
    const FIELDS: &'static [&'static str] = &[
        "id",
        "trade_name",
        "legal_name",
        "tax_id",
        "phone",
        "whatsapp",
        "email",
        "slug",
        "address",
        "logo_url",
        "banner_url",
        "settings",
        "active",
        "created_at",
        "updated_at",
        "deleted_at",
    ];

    fn id(&self) -> Uuid {
        self.id
    }

    fn deleted_at(&self) -> Option<DateTime<Utc>> {
        self.deleted_at
    }

    fn set_deleted_at(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }
}

/// Listing view: no tax id, address on one line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RestaurantSummary {
    pub id: Uuid,
    pub trade_name: String,
    pub slug: String,
    pub address: String,
    pub logo_url: Option<String>,
    pub banner_url: Option<String>,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct CreateRestaurant {
    #[validate(length(min = 1, max = 120))]
    pub trade_name: String,
    #[validate(length(min = 1, max = 200))]
    pub legal_name: String,
    #[validate(length(min = 1, max = 32))]
    pub tax_id: String,
    #[validate(length(min = 1, max = 32))]
    pub phone: String,
    #[serde(default)]
    #[validate(length(max = 32))]
    pub whatsapp: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 80), custom(function = "validate_slug"))]
    pub slug: String,
    #[validate(nested)]
    pub address: Address,
    #[serde(default)]
    #[validate(nested)]
    pub settings: Settings,
}

/// Partial update; absent fields keep their value
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct UpdateRestaurant {
    #[validate(length(min = 1, max = 120))]
    pub trade_name: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub legal_name: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub tax_id: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub phone: Option<String>,
    #[validate(length(max = 32))]
    pub whatsapp: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(min = 1, max = 80), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    #[validate(nested)]
    pub address: Option<Address>,
    #[validate(nested)]
    pub settings: Option<Settings>,
    pub active: Option<bool>,
}
