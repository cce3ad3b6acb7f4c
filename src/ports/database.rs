use crate::domain::{Club, Competition};

#[mockall::automock]
#[async_trait::async_trait]
pub trait DatabasePort {
    /// Find a club by its name or its secretary email
    async fn find_club(&self, name_or_email: &str) -> Result<Club, Error>;
    async fn find_competition(&self, name: &str) -> Result<Competition, Error>;
    async fn list_clubs(&self) -> Result<Vec<Club>, Error>;
    async fn list_competitions(&self) -> Result<Vec<Competition>, Error>;
    /// Store the updated club and competition of a booking
    ///
    /// Both records are committed together: if this returns an error, neither was stored.
    async fn save_booking(&self, club: Club, competition: Competition) -> Result<(), Error>;
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Domain-level error when no club matches the name or email
    #[error("club {0} does not exist")]
    ClubNotFound(String),

    /// Domain-level error when no competition matches the name
    #[error("competition {0} does not exist")]
    CompetitionNotFound(String),

    /// Concrete adapter errors
    ///
    /// This could represent any errors from a concrete adapter that is not part of the domain
    /// model, such as I/O, serialization, or corrupted data files.
    #[error("adapter error: {0:?}")]
    Adapter(Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    /// Whether the error comes from an unknown club or competition
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::ClubNotFound(_) | Error::CompetitionNotFound(_))
    }
}
