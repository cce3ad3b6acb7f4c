use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::{
    domain::{Club, Competition},
    ports::{clock::ClockPort, database::DatabasePort},
};
use tower::Service;

use super::{DomainLogic, Error};

/// Log a club secretary in by email
pub struct ShowSummaryRequest {
    pub email: String,
}

#[derive(Debug, PartialEq, Eq)]
pub struct ShowSummaryResponse {
    pub club: Club,
    pub competitions: Vec<Competition>,
}

impl<D, C> Service<ShowSummaryRequest> for DomainLogic<D, C>
where
    D: DatabasePort + 'static,
    C: ClockPort + 'static,
{
    type Response = ShowSummaryResponse;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, req: ShowSummaryRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let email = req.email.trim();
            if email.is_empty() {
                return Err(Error::InvalidRequest("No email provided".into()));
            }

            // The lookup also matches names, only an email is a valid login
            let club = database.find_club(email).await?;
            if club.email != email {
                return Err(crate::ports::database::Error::ClubNotFound(email.to_string()).into());
            }
            let competitions = database.list_competitions().await?;
            tracing::debug!(club = %club.name, "club logged in");

            Ok(ShowSummaryResponse { club, competitions })
        })
    }
}
