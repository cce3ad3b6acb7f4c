use std::{borrow::Cow, sync::Arc};

use crate::{
    domain::{booking::Rejection, Club, Competition},
    ports::database::DatabasePort,
};

mod locks;
pub mod points_board;
pub mod purchase_places;
pub mod show_booking;
pub mod show_summary;

pub use locks::BookingLocks;

pub struct DomainLogic<D, C> {
    database: Arc<D>,
    clock: Arc<C>,
    locks: BookingLocks,
}

impl<D, C> DomainLogic<D, C> {
    pub fn new(database: Arc<D>, clock: Arc<C>) -> Self {
        Self {
            database,
            clock,
            locks: BookingLocks::default(),
        }
    }
}

/// Clones share the same database, clock and booking locks
impl<D, C> Clone for DomainLogic<D, C> {
    fn clone(&self) -> Self {
        Self {
            database: self.database.clone(),
            clock: self.clock.clone(),
            locks: self.locks.clone(),
        }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("database port error: {0:?}")]
    Database(#[from] crate::ports::database::Error),

    /// Booking refused by a business rule, nothing was changed
    #[error("booking rejected: {0}")]
    Rejected(#[from] Rejection),

    #[error("invalid request: {0}")]
    InvalidRequest(Cow<'static, str>),
}

impl Error {
    /// Whether the request referenced an unknown club or competition
    ///
    /// Presentation layers should surface this as a client error rather than a form error.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Database(err) if err.is_not_found())
    }
}

/// Resolve the club and competition of a booking
async fn lookup<D>(database: &D, club: &str, competition: &str) -> Result<(Club, Competition), Error>
where
    D: DatabasePort + ?Sized,
{
    let club = database.find_club(club).await?;
    let competition = database.find_competition(competition).await?;

    Ok((club, competition))
}
