//! Search-as-you-type over a line-oriented input.

use anyhow::Result;
use taskhub_client::ListSource;
use taskhub_sync::{Phase, SearchDebouncer, Snapshot};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// Feed each input line to `debouncer` as the new search text and call
/// `show` with every settled snapshot. Returns at end of input, after the
/// last pending search has been applied.
pub(super) async fn follow<G, R>(
    debouncer: &SearchDebouncer<G>,
    input: R,
    mut show: impl FnMut(&Snapshot<G::Item>) -> Result<()>,
) -> Result<()>
where
    G: ListSource,
    R: AsyncBufRead + Unpin,
{
    let mut updates = debouncer.collection().subscribe();
    let _ = updates.borrow_and_update();
    let mut lines = input.lines();
    let mut pending = None;

    loop {
        tokio::select! {
            line = lines.next_line() => match line? {
                Some(text) => pending = Some(debouncer.search(text.trim())),
                None => break,
            },
            changed = updates.changed() => {
                changed?;
                let snapshot = updates.borrow_and_update().clone();
                if settled(&snapshot) {
                    show(&snapshot)?;
                }
            }
        }
    }

    if let Some(handle) = pending {
        let _ = handle.await?;
    }
    if updates.has_changed()? {
        let snapshot = updates.borrow_and_update().clone();
        if settled(&snapshot) {
            show(&snapshot)?;
        }
    }
    Ok(())
}

fn settled<T>(snapshot: &Snapshot<T>) -> bool {
    matches!(snapshot.phase, Phase::Ready | Phase::Failed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use taskhub_client::ApiError;
    use taskhub_core::{ListDescriptor, Page, Task};
    use taskhub_sync::Collection;

    #[derive(Clone, Default)]
    struct Titles {
        searches: Arc<Mutex<Vec<Option<String>>>>,
    }

    #[async_trait]
    impl ListSource for Titles {
        type Item = Task;

        async fn list(&self, descriptor: &ListDescriptor) -> Result<Page<Task>, ApiError> {
            self.searches.lock().unwrap().push(descriptor.search.clone());
            let all = [Task::new(1, "homepage"), Task::new(2, "login form")];
            let needle = descriptor.search.clone().unwrap_or_default();
            Ok(Page::unpaged(
                all.into_iter().filter(|t| t.title.contains(&needle)).collect(),
            ))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn typed_lines_fetch_once_for_the_last_text() {
        let source = Titles::default();
        let debouncer = SearchDebouncer::new(
            Collection::new(source.clone()),
            Duration::from_millis(300),
        );
        let mut shown = Vec::new();

        follow(&debouncer, &b"h\nhom\n home \n"[..], |snap| {
            shown.push((snap.descriptor.search.clone(), snap.len()));
            Ok(())
        })
        .await
        .unwrap();

        assert_eq!(*source.searches.lock().unwrap(), vec![Some("home".to_string())]);
        assert_eq!(shown, vec![(Some("home".to_string()), 1)]);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_input_shows_nothing() {
        let source = Titles::default();
        let debouncer = SearchDebouncer::new(Collection::new(source.clone()), Duration::from_millis(300));
        let mut calls = 0;
        follow(&debouncer, &b""[..], |_| {
            calls += 1;
            Ok(())
        })
        .await
        .unwrap();
        assert_eq!(calls, 0);
        assert!(source.searches.lock().unwrap().is_empty());
    }
}
