use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{
        booking::{self, Rejection},
        Club, Competition,
    },
    ports::{clock::ClockPort, database::DatabasePort},
};
use tower::Service;
use uuid::Uuid;

use super::{lookup, DomainLogic, Error};

pub struct PurchasePlacesRequest {
    /// Name or email of the club
    pub club: String,
    pub competition: String,
    /// Place count as typed in the booking form
    pub places: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct PurchasePlacesResponse {
    /// Identifier of this booking, for log correlation
    pub booking_id: Uuid,
    pub places: u32,
    /// Club after the booking
    pub club: Club,
    /// Competition after the booking
    pub competition: Competition,
}

impl<D, C> Service<PurchasePlacesRequest> for DomainLogic<D, C>
where
    D: DatabasePort + 'static,
    C: ClockPort + 'static,
{
    type Response = PurchasePlacesResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: PurchasePlacesRequest) -> Self::Future {
        let database = self.database.clone();
        let clock = self.clock.clone();
        let locks = self.locks.clone();
        Box::pin(async move {
            // Resolve names first so the locks are keyed on canonical names, not emails
            let (club, competition) = lookup(&*database, &req.club, &req.competition).await?;
            let _guard = locks.lock(&club.name, &competition.name).await;

            // Another booking may have committed while we were waiting for the locks
            let (mut club, mut competition) =
                lookup(&*database, &club.name, &competition.name).await?;

            let places = booking::validate(&club, &competition, &req.places, clock.now())
                .map_err(|rejection| rejected(&club, &competition, rejection))?;
            booking::apply_booking(&mut club, &mut competition, places)
                .map_err(|rejection| rejected(&club, &competition, rejection))?;

            // The store is untouched if this fails, and the updated copies are dropped
            if let Err(err) = database
                .save_booking(club.clone(), competition.clone())
                .await
            {
                tracing::error!(
                    club = %club.name,
                    competition = %competition.name,
                    error = %err,
                    "failed to persist booking"
                );
                return Err(err.into());
            }

            let booking_id = Uuid::new_v4();
            tracing::info!(
                %booking_id,
                club = %club.name,
                competition = %competition.name,
                places,
                remaining_points = club.points,
                remaining_places = competition.number_of_places,
                "booking complete"
            );

            Ok(PurchasePlacesResponse {
                booking_id,
                places,
                club,
                competition,
            })
        })
    }
}

fn rejected(club: &Club, competition: &Competition, rejection: Rejection) -> Error {
    tracing::info!(
        club = %club.name,
        competition = %competition.name,
        reason = ?rejection,
        "booking rejected"
    );
    rejection.into()
}
