use crate::{
    error::AppResult,
    models::{ContentAdvisory, Title, TitleDetails, TitleKey},
    services::{advisory, providers::MetadataProvider},
};

/// Searches the catalog by title name
pub async fn search_titles(provider: &dyn MetadataProvider, query: &str) -> AppResult<Vec<Title>> {
    provider.search_titles(query).await
}

/// Loads a title with its certification and derived parental guide
pub async fn title_details(provider: &dyn MetadataProvider, key: &TitleKey) -> AppResult<TitleDetails> {
    let (metadata, certification) = tokio::try_join!(
        provider.fetch_metadata(key),
        provider.fetch_certification(key)
    )?;

    let advisory = advisory::classify(certification.as_deref(), &metadata.genres);

    tracing::debug!(
        title = %key,
        provider = provider.name(),
        certification = ?certification,
        family_friendly = advisory.is_family_friendly,
        "Advisory derived"
    );

    Ok(TitleDetails {
        title: metadata.title,
        genres: metadata.genres,
        runtime_minutes: metadata.runtime_minutes,
        certification,
        advisory,
    })
}

/// Parental guide only
pub async fn title_advisory(
    provider: &dyn MetadataProvider,
    key: &TitleKey,
) -> AppResult<ContentAdvisory> {
    Ok(title_details(provider, key).await?.advisory)
}
