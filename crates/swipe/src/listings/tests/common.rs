use std::sync::Arc;

use chrono::Utc;

use crate::housing::domain::{Decoration, Heating};
use crate::listings::domain::{
    AgentCommission, Announcement, AnnouncementDetails, AnnouncementDraft, Communication,
    FoundingDocument, Layout, PaymentOptions, Purpose,
};
use crate::listings::ListingService;
use crate::store::{AnnouncementId, ComplexId, TableStore, UserId};
use crate::test_support::World;

pub(crate) fn details() -> AnnouncementDetails {
    AnnouncementDetails {
        address: "Frantsuzky bulvar 60".to_string(),
        description: "Two rooms near the sea".to_string(),
        area: 62.0,
        area_kitchen: 12.5,
        balcony_or_loggia: true,
        price: 93_000,
        founding_document: FoundingDocument::Ownership,
        rooms: 2,
        layout: Layout::Euro,
        condition: Decoration::ResidentialCondition,
        heating: Heating::Autonomous,
        payment_options: PaymentOptions::Mortgage,
        agent_commission: AgentCommission::Medium,
        communication: Communication::CallAndMessage,
    }
}

pub(crate) fn announcement(id: u64, purpose: Purpose) -> Announcement {
    Announcement {
        id: AnnouncementId(id),
        creator: UserId(1),
        purpose,
        residential_complex: None,
        details: details(),
        date_created: Utc::now(),
        is_active: true,
        is_moderation_check: false,
        count_view: 0,
    }
}

pub(crate) fn flat_draft(complex: ComplexId) -> AnnouncementDraft {
    AnnouncementDraft {
        purpose: Purpose::Flat,
        residential_complex: Some(complex),
        details: details(),
        images: vec!["announcements/front.jpg".to_string()],
    }
}

pub(crate) fn office_draft() -> AnnouncementDraft {
    AnnouncementDraft {
        purpose: Purpose::Office,
        residential_complex: None,
        details: details(),
        images: Vec::new(),
    }
}

pub(crate) fn service(world: &World) -> Arc<ListingService<TableStore>> {
    Arc::new(ListingService::new(Arc::clone(&world.store)))
}

/// Create a flat in the world's complex and approve it.
pub(crate) fn approved_flat(
    world: &World,
    listings: &ListingService<TableStore>,
) -> AnnouncementId {
    let id = listings
        .create(world.member, flat_draft(world.complex))
        .expect("flat created")
        .announcement
        .id;
    listings
        .moderate(
            world.staff,
            id,
            crate::listings::domain::ModerationDecision {
                is_moderation_check: true,
            },
        )
        .expect("approved");
    id
}
