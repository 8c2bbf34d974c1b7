use std::collections::{BTreeMap, BTreeSet};

use super::ids::*;
use crate::accounts::domain::{Contact, Message, Notary, SavedFilter, Subscription, User};
use crate::housing::domain::{
    Benefits, ComplexImage, Document, News, RegistrationAndPayment, ResidentialComplex,
};
use crate::listings::domain::{
    Advertising, Announcement, AnnouncementImage, Apartment, Complaint,
};

/// Every relational table plus the id sequence shared by all of them.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub(super) next_id: u64,
    pub users: BTreeMap<UserId, User>,
    pub contacts: BTreeMap<ContactId, Contact>,
    pub subscriptions: BTreeMap<SubscriptionId, Subscription>,
    pub notaries: BTreeMap<NotaryId, Notary>,
    pub messages: BTreeMap<MessageId, Message>,
    pub filters: BTreeMap<FilterId, SavedFilter>,
    pub complexes: BTreeMap<ComplexId, ResidentialComplex>,
    pub benefits: BTreeMap<ComplexId, Benefits>,
    pub registrations: BTreeMap<ComplexId, RegistrationAndPayment>,
    pub complex_images: BTreeMap<ComplexImageId, ComplexImage>,
    pub news: BTreeMap<NewsId, News>,
    pub documents: BTreeMap<DocumentId, Document>,
    pub announcements: BTreeMap<AnnouncementId, Announcement>,
    pub announcement_images: BTreeMap<AnnouncementImageId, AnnouncementImage>,
    pub advertising: BTreeMap<AdvertisingId, Advertising>,
    pub apartments: BTreeMap<ApartmentId, Apartment>,
    pub complaints: BTreeMap<ComplaintId, Complaint>,
    pub favorite_announcements: BTreeSet<(UserId, AnnouncementId)>,
    pub favorite_complexes: BTreeSet<(UserId, ComplexId)>,
}

impl Tables {
    pub fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn user_by_email(&self, email: &str) -> Option<&User> {
        self.users
            .values()
            .find(|user| user.email.eq_ignore_ascii_case(email))
    }

    pub fn agent_contact_of(&self, user: UserId) -> Option<&Contact> {
        self.contacts
            .values()
            .find(|contact| contact.user == Some(user))
    }

    pub fn sales_contact_of(&self, complex: ComplexId) -> Option<&Contact> {
        self.contacts
            .values()
            .find(|contact| contact.residential_complex == Some(complex))
    }

    pub fn subscription_of(&self, user: UserId) -> Option<&Subscription> {
        self.subscriptions
            .values()
            .find(|subscription| subscription.user == user)
    }

    pub fn complex_of(&self, developer: UserId) -> Option<&ResidentialComplex> {
        self.complexes
            .values()
            .find(|complex| complex.developer == developer)
    }

    pub fn filters_of(&self, user: UserId) -> impl Iterator<Item = &SavedFilter> {
        self.filters
            .values()
            .filter(move |filter| filter.user == user)
    }

    pub fn advertising_of(&self, announcement: AnnouncementId) -> Option<&Advertising> {
        self.advertising
            .values()
            .find(|advertising| advertising.announcement == announcement)
    }

    pub fn apartment_of(&self, announcement: AnnouncementId) -> Option<&Apartment> {
        self.apartments
            .values()
            .find(|apartment| apartment.announcement == announcement)
    }

    pub fn apartment_of_mut(&mut self, announcement: AnnouncementId) -> Option<&mut Apartment> {
        self.apartments
            .values_mut()
            .find(|apartment| apartment.announcement == announcement)
    }

    pub fn gallery_of(&self, announcement: AnnouncementId) -> Vec<AnnouncementImage> {
        self.announcement_images
            .values()
            .filter(|image| image.announcement == announcement)
            .cloned()
            .collect()
    }

    /// Complex gallery ordered by `order`, unordered images last in insertion order.
    pub fn complex_gallery(&self, complex: ComplexId) -> Vec<ComplexImage> {
        let mut images: Vec<ComplexImage> = self
            .complex_images
            .values()
            .filter(|image| image.residential_complex == complex)
            .cloned()
            .collect();
        images.sort_by_key(|image| (image.order.is_none(), image.order, image.id));
        images
    }

    /// Drop an announcement and every row that hangs off it.
    pub fn remove_announcement(&mut self, id: AnnouncementId) -> Option<Announcement> {
        let removed = self.announcements.remove(&id)?;
        self.advertising
            .retain(|_, advertising| advertising.announcement != id);
        self.apartments.retain(|_, apartment| apartment.announcement != id);
        self.announcement_images
            .retain(|_, image| image.announcement != id);
        self.complaints.retain(|_, complaint| complaint.announcement != id);
        self.favorite_announcements
            .retain(|(_, announcement)| *announcement != id);
        Some(removed)
    }

    /// Drop a complex with its dependents; announcements keep living without it.
    pub fn remove_complex(&mut self, id: ComplexId) -> Option<ResidentialComplex> {
        let removed = self.complexes.remove(&id)?;
        self.benefits.remove(&id);
        self.registrations.remove(&id);
        self.contacts
            .retain(|_, contact| contact.residential_complex != Some(id));
        self.complex_images
            .retain(|_, image| image.residential_complex != id);
        self.news.retain(|_, news| news.residential_complex != id);
        self.documents
            .retain(|_, document| document.residential_complex != id);
        self.favorite_complexes.retain(|(_, complex)| *complex != id);
        for announcement in self.announcements.values_mut() {
            if announcement.residential_complex == Some(id) {
                announcement.residential_complex = None;
            }
        }
        Some(removed)
    }
}
