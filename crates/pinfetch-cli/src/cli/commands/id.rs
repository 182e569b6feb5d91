//! `pinfetch id` – print the dedup key of a URL.

use pinfetch_core::identifier::ContentId;

pub fn run_id(url: &str) {
    println!("{}  {}", ContentId::for_url(url), url);
}
