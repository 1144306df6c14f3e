//! Daily devotional content: fetch the stored record for a date or generate
//! one from the built-in rotation. Generation is deterministic per date, so
//! repeated calls for the same day agree even before the row is persisted.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate};

use crate::app::{Result, SelahError};
use crate::domain::{date_key, millis, Devotional};
use crate::store::Store;

pub const DEFAULT_DEVOTIONAL_RETENTION_DAYS: i64 = 30;

struct Meditation {
    title: &'static str,
    verse_reference: &'static str,
    verse_text: &'static str,
    body: &'static str,
    prayer: &'static str,
}

const MEDITATIONS: [Meditation; 5] = [
    Meditation {
        title: "Lámpara a mis pies",
        verse_reference: "Salmos 119:105",
        verse_text: "Lámpara es a mis pies tu palabra, y lumbrera a mi camino.",
        body: "La Palabra de Dios ilumina nuestro camino cada día. En momentos de \
               incertidumbre, podemos confiar en que Sus enseñanzas nos guiarán hacia \
               la verdad y la paz.",
        prayer: "Señor, gracias por tu Palabra que ilumina mi vida. Ayúdame a caminar \
                 siempre en tu luz. Amén.",
    },
    Meditation {
        title: "Fortaleza en la espera",
        verse_reference: "Isaías 40:31",
        verse_text: "Pero los que esperan a Jehová tendrán nuevas fuerzas; levantarán \
                     alas como las águilas.",
        body: "Esperar no es pasividad sino confianza activa. Quien espera en Dios \
               renueva sus fuerzas para el día que tiene por delante.",
        prayer: "Padre, enséñame a esperar en ti y a renovar mis fuerzas cada mañana. Amén.",
    },
    Meditation {
        title: "El buen pastor",
        verse_reference: "Salmos 23:1",
        verse_text: "Jehová es mi pastor; nada me faltará.",
        body: "El pastor conoce a sus ovejas y provee lo que necesitan. Hoy podemos \
               descansar en esa provisión sin afán por el mañana.",
        prayer: "Señor, tú eres mi pastor. Gracias porque nada me falta a tu lado. Amén.",
    },
    Meditation {
        title: "Paz que sobrepasa",
        verse_reference: "Filipenses 4:7",
        verse_text: "Y la paz de Dios, que sobrepasa todo entendimiento, guardará \
                     vuestros corazones y vuestros pensamientos en Cristo Jesús.",
        body: "La paz de Dios no depende de las circunstancias. Guardar el corazón en \
               Cristo es el ancla en cualquier tormenta.",
        prayer: "Dios de paz, guarda hoy mi corazón y mis pensamientos en ti. Amén.",
    },
    Meditation {
        title: "Nuevas cada mañana",
        verse_reference: "Lamentaciones 3:22-23",
        verse_text: "Por la misericordia de Jehová no hemos sido consumidos, porque \
                     nunca decayeron sus misericordias; nuevas son cada mañana.",
        body: "Cada amanecer trae misericordias nuevas. Lo de ayer quedó atrás; hoy es \
               una página en blanco escrita con fidelidad.",
        prayer: "Gracias, Señor, por tus misericordias que se renuevan cada mañana. Amén.",
    },
];

pub struct DevotionalProvider {
    store: Arc<dyn Store + Send + Sync>,
    retention_days: i64,
}

impl DevotionalProvider {
    pub fn new(store: Arc<dyn Store + Send + Sync>) -> Self {
        Self::with_retention(store, DEFAULT_DEVOTIONAL_RETENTION_DAYS)
    }

    pub fn with_retention(store: Arc<dyn Store + Send + Sync>, retention_days: i64) -> Self {
        Self {
            store,
            retention_days,
        }
    }

    /// The devotional for a calendar date, generating and persisting one if
    /// none is stored yet.
    pub fn get_or_generate(&self, date: NaiveDate) -> Result<Devotional> {
        let key = date_key(date);
        if let Some(existing) = self.store.get_devotional(&key)? {
            return Ok(existing);
        }

        let devotional = generate(date);
        self.store.upsert_devotional(&devotional)?;
        tracing::debug!("Generated devotional for {}", key);
        Ok(devotional)
    }

    pub fn today(&self, now: DateTime<Local>) -> Result<Devotional> {
        self.get_or_generate(now.date_naive())
    }

    pub fn mark_read(&self, date: NaiveDate) -> Result<()> {
        let key = date_key(date);
        if !self.store.mark_devotional_read(&key)? {
            return Err(SelahError::NotFound(format!("devotional for {key}")));
        }
        Ok(())
    }

    pub fn recent(&self, limit: usize) -> Result<Vec<Devotional>> {
        self.store.recent_devotionals(limit)
    }

    pub fn next_unread(&self) -> Result<Option<Devotional>> {
        self.store.next_unread_devotional()
    }

    pub fn read_count(&self) -> Result<i64> {
        self.store.devotional_read_count()
    }

    /// Drop devotionals older than the retention horizon.
    pub fn prune(&self, now: DateTime<Local>) -> Result<usize> {
        let cutoff = now.date_naive() - Duration::days(self.retention_days);
        self.store.delete_devotionals_before(&date_key(cutoff))
    }
}

fn generate(date: NaiveDate) -> Devotional {
    let pick = date.num_days_from_ce().rem_euclid(MEDITATIONS.len() as i32) as usize;
    let meditation = &MEDITATIONS[pick];
    Devotional {
        date: date_key(date),
        title: meditation.title.to_string(),
        verse_reference: meditation.verse_reference.to_string(),
        verse_text: meditation.verse_text.to_string(),
        body: meditation.body.to_string(),
        prayer: Some(meditation.prayer.to_string()),
        is_read: false,
        created_at: millis(Local::now()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::store::SqliteStore;

    fn provider() -> DevotionalProvider {
        DevotionalProvider::new(Arc::new(SqliteStore::in_memory().unwrap()))
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    #[test]
    fn generates_once_per_date() {
        let provider = provider();
        let first = provider.get_or_generate(day(1)).unwrap();
        let second = provider.get_or_generate(day(1)).unwrap();
        assert_eq!(first.title, second.title);
        assert_eq!(first.created_at, second.created_at);
        assert_eq!(provider.recent(10).unwrap().len(), 1);
    }

    #[test]
    fn rotation_varies_across_dates() {
        let provider = provider();
        let a = provider.get_or_generate(day(1)).unwrap();
        let b = provider.get_or_generate(day(2)).unwrap();
        assert_ne!(a.title, b.title);
    }

    #[test]
    fn mark_read_flips_the_flag_only() {
        let provider = provider();
        let before = provider.get_or_generate(day(1)).unwrap();
        provider.mark_read(day(1)).unwrap();

        let after = provider.get_or_generate(day(1)).unwrap();
        assert!(after.is_read);
        assert_eq!(after.body, before.body);
        assert_eq!(provider.read_count().unwrap(), 1);
    }

    #[test]
    fn mark_read_on_missing_date_is_not_found() {
        let provider = provider();
        assert!(matches!(
            provider.mark_read(day(9)),
            Err(SelahError::NotFound(_))
        ));
    }

    #[test]
    fn next_unread_walks_dates_ascending() {
        let provider = provider();
        provider.get_or_generate(day(1)).unwrap();
        provider.get_or_generate(day(2)).unwrap();
        provider.mark_read(day(1)).unwrap();

        let next = provider.next_unread().unwrap().unwrap();
        assert_eq!(next.date, "2024-05-02");
    }

    #[test]
    fn prune_honors_retention() {
        use chrono::TimeZone;

        let provider = provider();
        provider.get_or_generate(day(1)).unwrap();
        provider
            .get_or_generate(NaiveDate::from_ymd_opt(2024, 6, 15).unwrap())
            .unwrap();

        // Retention is 30 days: the cutoff lands on 2024-06-01.
        let now = Local.with_ymd_and_hms(2024, 7, 1, 12, 0, 0).unwrap();
        let deleted = provider.prune(now).unwrap();
        assert_eq!(deleted, 1);
        assert_eq!(provider.recent(10).unwrap().len(), 1);
    }
}
