use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! entity_id {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(
                Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
            )]
            #[serde(transparent)]
            pub struct $name(pub u64);

            impl fmt::Display for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, "{}", self.0)
                }
            }

            impl From<u64> for $name {
                fn from(value: u64) -> Self {
                    Self(value)
                }
            }
        )+
    };
}

entity_id!(
    UserId,
    ContactId,
    SubscriptionId,
    NotaryId,
    MessageId,
    FilterId,
    ComplexId,
    NewsId,
    DocumentId,
    /// Gallery image of a residential complex.
    ComplexImageId,
    AnnouncementId,
    /// Gallery image of an announcement.
    AnnouncementImageId,
    AdvertisingId,
    ApartmentId,
    ComplaintId,
);
