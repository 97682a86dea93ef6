use crate::{error::CatalogError, spotify::CatalogClient, types::ArtistCandidate};

/// Outcome of resolving one artist name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Found(ArtistCandidate),
    NotFound,
    Failed(CatalogError),
}

pub struct ArtistResolver<'a> {
    client: &'a dyn CatalogClient,
    search_limit: u32,
}

impl<'a> ArtistResolver<'a> {
    pub fn new(client: &'a dyn CatalogClient, search_limit: u32) -> Self {
        Self {
            client,
            search_limit,
        }
    }

    /// Resolves a name to the most popular matching artist.
    ///
    /// An empty search is [`Resolution::NotFound`]; only catalog failures are
    /// [`Resolution::Failed`].
    pub async fn resolve(&self, name: &str) -> Resolution {
        match self.candidates(name).await {
            Ok(candidates) => match choose_most_popular(candidates) {
                Some(artist) => {
                    log::debug!(
                        "Resolved '{}' to {} (popularity {})",
                        name,
                        artist.name,
                        artist.popularity
                    );
                    Resolution::Found(artist)
                }
                None => Resolution::NotFound,
            },
            Err(e) => {
                log::warn!("Failed to search for '{}': {}", name, e);
                Resolution::Failed(e)
            }
        }
    }

    pub async fn candidates(&self, name: &str) -> Result<Vec<ArtistCandidate>, CatalogError> {
        self.client.search_artists(name.trim(), self.search_limit).await
    }
}

/// Highest popularity wins; ties go to the candidate listed first.
pub fn choose_most_popular(candidates: Vec<ArtistCandidate>) -> Option<ArtistCandidate> {
    candidates.into_iter().fold(None, |best, candidate| match best {
        Some(best) if best.popularity >= candidate.popularity => Some(best),
        _ => Some(candidate),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spotify::MockCatalogClient;
    use mockall::predicate::*;

    fn candidate(id: &str, popularity: u8) -> ArtistCandidate {
        ArtistCandidate {
            id: id.to_string(),
            name: format!("Artist {id}"),
            popularity,
        }
    }

    #[test]
    fn test_choose_most_popular_first_wins_on_tie() {
        let chosen = choose_most_popular(vec![
            candidate("a", 40),
            candidate("b", 80),
            candidate("c", 80),
        ]);
        assert_eq!(chosen.map(|c| c.id), Some("b".to_string()));
    }

    #[test]
    fn test_choose_most_popular_empty() {
        assert_eq!(choose_most_popular(Vec::new()), None);
    }

    #[tokio::test]
    async fn test_resolve_found() {
        let mut mock = MockCatalogClient::new();
        mock.expect_search_artists()
            .with(eq("Daft Punk"), eq(10))
            .times(1)
            .returning(|_, _| Ok(vec![candidate("x", 12), candidate("y", 90)]));

        let resolver = ArtistResolver::new(&mock, 10);
        match resolver.resolve("  Daft Punk ").await {
            Resolution::Found(artist) => assert_eq!(artist.id, "y"),
            other => panic!("Expected a resolved artist, got: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_resolve_not_found() {
        let mut mock = MockCatalogClient::new();
        mock.expect_search_artists()
            .times(1)
            .returning(|_, _| Ok(Vec::new()));

        let resolver = ArtistResolver::new(&mock, 5);
        assert_eq!(resolver.resolve("Nobody").await, Resolution::NotFound);
    }

    #[tokio::test]
    async fn test_resolve_transport_failure_is_distinct() {
        let mut mock = MockCatalogClient::new();
        mock.expect_search_artists()
            .times(1)
            .returning(|_, _| Err(CatalogError::Http("connection reset".to_string())));

        let resolver = ArtistResolver::new(&mock, 5);
        assert_eq!(
            resolver.resolve("Anyone").await,
            Resolution::Failed(CatalogError::Http("connection reset".to_string()))
        );
    }
}
