use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{booking, Club, Competition},
    ports::{clock::ClockPort, database::DatabasePort},
};
use tower::Service;

use super::{lookup, DomainLogic, Error};

/// Open the booking form of a competition for a club
pub struct ShowBookingRequest {
    pub club: String,
    pub competition: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ShowBookingResponse {
    pub club: Club,
    pub competition: Competition,
    /// Upper bound for the place count field of the form
    pub max_places: u32,
}

impl<D, C> Service<ShowBookingRequest> for DomainLogic<D, C>
where
    D: DatabasePort + 'static,
    C: ClockPort + 'static,
{
    type Response = ShowBookingResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ShowBookingRequest) -> Self::Future {
        let database = self.database.clone();
        let clock = self.clock.clone();
        Box::pin(async move {
            let (club, competition) = lookup(&*database, &req.club, &req.competition).await?;
            booking::ensure_open(&competition, clock.now())?;

            Ok(ShowBookingResponse {
                max_places: booking::max_bookable(&club, &competition),
                club,
                competition,
            })
        })
    }
}
