use crate::infra;
use chrono::NaiveDate;
use clap::Args;
use serde::Serialize;
use std::sync::Arc;
use swipe::access::Caller;
use swipe::accounts::domain::Registration;
use swipe::error::AppError;
use swipe::housing::domain::{Decoration, Heating};
use swipe::listings::domain::{
    AgentCommission, AnnouncementDetails, AnnouncementDraft, Communication, FoundingDocument,
    Layout, ModerationDecision, PaymentOptions, Purpose,
};
use swipe::store::{ComplexId, UserId};
use swipe::{calendar, AccountService, EntityStore, ListingService};

#[derive(Args, Debug)]
pub(crate) struct SeedArgs {
    /// Number of member accounts, each publishing one approved announcement
    #[arg(long, default_value_t = 5)]
    pub(crate) members: u32,
    /// Number of developer accounts, each owning one residential complex
    #[arg(long, default_value_t = 2)]
    pub(crate) developers: u32,
}

#[derive(Debug, Default, Serialize)]
pub(crate) struct SeedSummary {
    pub(crate) moderator: Option<UserId>,
    pub(crate) developers: Vec<UserId>,
    pub(crate) members: Vec<UserId>,
    pub(crate) announcements: usize,
}

pub(crate) fn run_seed(args: SeedArgs) -> Result<(), AppError> {
    let config = infra::load_config()?;
    let store = infra::open_store(&config.store)?;

    let summary = seed(store, args.members, args.developers, calendar::today())?;
    let rendered = serde_json::to_string_pretty(&summary)
        .unwrap_or_else(|_| format!("{summary:?}"));
    println!("{rendered}");
    Ok(())
}

fn registration(email: String, first_name: &str, is_developer: bool) -> Registration {
    Registration {
        email,
        first_name: first_name.to_string(),
        last_name: "Demo".to_string(),
        phone: Some("+380000000000".to_string()),
        is_developer,
    }
}

fn details(index: u32) -> AnnouncementDetails {
    let area = 40.0 + f64::from(index % 6) * 12.5;
    AnnouncementDetails {
        address: format!("Seed street {index}"),
        description: "Generated demo listing".to_string(),
        area,
        area_kitchen: area / 5.0,
        balcony_or_loggia: index % 2 == 0,
        price: 30_000 + u64::from(index) * 7_500,
        founding_document: FoundingDocument::Ownership,
        rooms: (index % 4 + 1) as u8,
        layout: Layout::Classic,
        condition: Decoration::ResidentialCondition,
        heating: Heating::Central,
        payment_options: PaymentOptions::Other,
        agent_commission: AgentCommission::Small,
        communication: Communication::CallAndMessage,
    }
}

/// Existing e-mails are left untouched, so a second run adds nothing.
pub(crate) fn seed<S>(
    store: Arc<S>,
    members: u32,
    developers: u32,
    today: NaiveDate,
) -> Result<SeedSummary, AppError>
where
    S: EntityStore + 'static,
{
    let accounts = AccountService::new(Arc::clone(&store));
    let listings = ListingService::new(Arc::clone(&store));
    let mut summary = SeedSummary::default();

    let known = |email: &str| store.read(|tables| tables.user_by_email(email).map(|user| user.id));

    let moderator_email = "moderator@swipe.local".to_string();
    let moderator = match known(&moderator_email)? {
        Some(id) => id,
        None => {
            let id = accounts
                .create_superuser(registration(moderator_email, "Moderator", false), today)?
                .id;
            summary.moderator = Some(id);
            id
        }
    };

    for index in 1..=developers {
        let email = format!("developer{index}@swipe.local");
        if known(&email)?.is_none() {
            let id = accounts
                .register(registration(email, "Developer", true), today)?
                .id;
            summary.developers.push(id);
        }
    }

    let complexes: Vec<ComplexId> =
        store.read(|tables| tables.complexes.keys().copied().collect())?;

    for index in 1..=members {
        let email = format!("member{index}@swipe.local");
        if known(&email)?.is_some() {
            continue;
        }
        let member = accounts
            .register(registration(email, "Member", false), today)?
            .id;
        summary.members.push(member);

        let residential_complex = if complexes.is_empty() {
            None
        } else {
            Some(complexes[index as usize % complexes.len()])
        };
        let draft = AnnouncementDraft {
            purpose: residential_complex.map_or(Purpose::Apartments, |_| Purpose::Flat),
            residential_complex,
            details: details(index),
            images: Vec::new(),
        };
        let announcement = listings.create(Caller(member), draft)?.announcement.id;
        listings.moderate(
            Caller(moderator),
            announcement,
            ModerationDecision {
                is_moderation_check: true,
            },
        )?;
        summary.announcements += 1;
    }

    tracing::info!(
        developers = summary.developers.len(),
        members = summary.members.len(),
        announcements = summary.announcements,
        "store seeded"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use swipe::TableStore;

    #[test]
    fn seeding_twice_adds_nothing_the_second_time() {
        let store = Arc::new(TableStore::new());
        let today = NaiveDate::from_ymd_opt(2024, 6, 1).expect("valid date");

        let first = seed(Arc::clone(&store), 3, 2, today).expect("seeded");
        assert!(first.moderator.is_some());
        assert_eq!(first.developers.len(), 2);
        assert_eq!(first.members.len(), 3);
        assert_eq!(first.announcements, 3);

        let second = seed(Arc::clone(&store), 3, 2, today).expect("seeded again");
        assert!(second.moderator.is_none());
        assert_eq!(second.announcements, 0);

        let (announcements, apartments) = store
            .read(|tables| (tables.announcements.len(), tables.apartments.len()))
            .expect("read");
        assert_eq!(announcements, 3);
        assert_eq!(apartments, 3);
    }
}
