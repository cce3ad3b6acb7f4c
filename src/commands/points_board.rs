use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
};

use crate::ports::{clock::ClockPort, database::DatabasePort};
use tower::Service;

use super::{DomainLogic, Error};

/// Public board of the points left to every club
pub struct PointsBoardRequest;

#[derive(Debug, PartialEq, Eq)]
pub struct ClubPoints {
    pub name: String,
    pub points: u32,
}

impl<D, C> Service<PointsBoardRequest> for DomainLogic<D, C>
where
    D: DatabasePort + 'static,
    C: ClockPort + 'static,
{
    type Response = Vec<ClubPoints>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, _req: PointsBoardRequest) -> Self::Future {
        let database = self.database.clone();
        Box::pin(async move {
            let board = database
                .list_clubs()
                .await?
                .into_iter()
                .map(|club| ClubPoints {
                    name: club.name,
                    points: club.points,
                })
                .collect();

            Ok(board)
        })
    }
}
