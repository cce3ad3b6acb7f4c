use crate::{
    domain::{Club, Competition},
    ports::database::{DatabasePort, Error},
};
use std::{
    collections::{btree_map::Entry, BTreeMap},
    sync::{Arc, Mutex, PoisonError},
};

/// Clubs and competitions keyed by their unique name
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Collections {
    clubs: BTreeMap<String, Club>,
    competitions: BTreeMap<String, Competition>,
}

impl Collections {
    /// Build the collections, refusing two records with the same name or two clubs with the same
    /// email
    ///
    /// Clubs are looked up by name or email, so a club name may not be the email of another club
    /// either.
    pub fn new(clubs: Vec<Club>, competitions: Vec<Competition>) -> Result<Self, Error> {
        let mut collections = Self::default();
        for club in clubs {
            if collections.clubs.values().any(|c| c.email == club.email) {
                return Err(DuplicateKey(format!("club email {}", club.email)).into());
            }
            if collections
                .clubs
                .values()
                .any(|c| c.email == club.name || c.name == club.email)
            {
                return Err(DuplicateKey(format!("club {} and its email", club.name)).into());
            }
            match collections.clubs.entry(club.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(DuplicateKey(format!("club {}", club.name)).into());
                }
                Entry::Vacant(entry) => {
                    entry.insert(club);
                }
            }
        }
        for competition in competitions {
            match collections.competitions.entry(competition.name.clone()) {
                Entry::Occupied(_) => {
                    return Err(DuplicateKey(format!("competition {}", competition.name)).into());
                }
                Entry::Vacant(entry) => {
                    entry.insert(competition);
                }
            }
        }

        Ok(collections)
    }

    pub fn find_club(&self, name_or_email: &str) -> Result<Club, Error> {
        self.clubs
            .get(name_or_email)
            .or_else(|| self.clubs.values().find(|club| club.email == name_or_email))
            .cloned()
            .ok_or_else(|| Error::ClubNotFound(name_or_email.to_string()))
    }

    pub fn find_competition(&self, name: &str) -> Result<Competition, Error> {
        self.competitions
            .get(name)
            .cloned()
            .ok_or_else(|| Error::CompetitionNotFound(name.to_string()))
    }

    pub fn clubs(&self) -> Vec<Club> {
        self.clubs.values().cloned().collect()
    }

    pub fn competitions(&self) -> Vec<Competition> {
        self.competitions.values().cloned().collect()
    }

    /// Replace both records of a booking
    ///
    /// Records are only replaced, never created, and nothing changes unless both exist.
    pub fn replace_booking(&mut self, club: Club, competition: Competition) -> Result<(), Error> {
        if !self.clubs.contains_key(&club.name) {
            return Err(Error::ClubNotFound(club.name));
        }
        if !self.competitions.contains_key(&competition.name) {
            return Err(Error::CompetitionNotFound(competition.name));
        }

        self.clubs.insert(club.name.clone(), club);
        self.competitions
            .insert(competition.name.clone(), competition);

        Ok(())
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryDatabase {
    collections: Arc<Mutex<Collections>>,
}

impl MemoryDatabase {
    pub fn new(clubs: Vec<Club>, competitions: Vec<Competition>) -> Result<Self, Error> {
        Ok(Self {
            collections: Arc::new(Mutex::new(Collections::new(clubs, competitions)?)),
        })
    }
}

#[async_trait::async_trait]
impl DatabasePort for MemoryDatabase {
    async fn find_club(&self, name_or_email: &str) -> Result<Club, Error> {
        self.collections.lock()?.find_club(name_or_email)
    }

    async fn find_competition(&self, name: &str) -> Result<Competition, Error> {
        self.collections.lock()?.find_competition(name)
    }

    async fn list_clubs(&self) -> Result<Vec<Club>, Error> {
        Ok(self.collections.lock()?.clubs())
    }

    async fn list_competitions(&self) -> Result<Vec<Competition>, Error> {
        Ok(self.collections.lock()?.competitions())
    }

    async fn save_booking(&self, club: Club, competition: Competition) -> Result<(), Error> {
        self.collections.lock()?.replace_booking(club, competition)
    }
}

/// Two records share a key that must be unique
#[derive(Debug, thiserror::Error)]
#[error("duplicate key: {0}")]
pub struct DuplicateKey(String);

impl From<DuplicateKey> for Error {
    fn from(err: DuplicateKey) -> Self {
        Self::Adapter(Box::new(err))
    }
}

/// Erased [`PoisonError`]
///
/// A panic while a booking held the collections mutex poisons it. The port error must be
/// `Send + Sync` to cross the service boundary, but `PoisonError` carries the non-`Send` guard,
/// so only its message is kept.
#[derive(Debug, thiserror::Error)]
#[error("poison error: {0}")]
pub struct ErasedPoisonError(String);

impl<T> From<PoisonError<T>> for Error {
    fn from(err: PoisonError<T>) -> Self {
        Self::Adapter(Box::new(ErasedPoisonError(err.to_string())))
    }
}
