use chanakya_core::carousel::{CarouselTicker, Cycler};
use chanakya_core::config::Settings;
use chanakya_core::domain::news::default_feed;

/// Prints the current headline, then one line per carousel tick.
pub async fn run(settings: &Settings, ticks: usize) -> anyhow::Result<()> {
    let feed = default_feed();
    if feed.is_empty() {
        tracing::info!("news feed is empty");
        return Ok(());
    }

    let ticker = CarouselTicker::spawn(Cycler::new(feed.len()), settings.carousel_interval);
    let mut rx = ticker.subscribe();

    print_headline(&feed[*rx.borrow_and_update()]);
    for _ in 0..ticks {
        tokio::select! {
            changed = rx.changed() => {
                changed?;
                let index = *rx.borrow_and_update();
                print_headline(&feed[index]);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    ticker.stop();
    Ok(())
}

fn print_headline(item: &chanakya_core::domain::news::NewsItem) {
    println!("[{}] {} ({}, {})", item.category, item.title, item.source, item.time);
}
