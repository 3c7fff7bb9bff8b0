//! Hand-authored sample data for demo mode.
//!
//! Demo runs bypass the network entirely but still push every sample
//! through the real normalizer and deal filter, so the arithmetic is
//! identical to a live run on the same inputs.

use common::{RawCandidate, SourceId};

fn sample(
    model_key: &str,
    title: &str,
    price_text: &str,
    location: &str,
    year: &str,
    mileage: &str,
    url: &str,
    source: SourceId,
) -> (String, RawCandidate) {
    (
        model_key.to_string(),
        RawCandidate {
            title: title.into(),
            price_text: price_text.into(),
            location: location.into(),
            year_text: year.into(),
            mileage_text: mileage.into(),
            url: url.into(),
            image_url: None,
            source,
        },
    )
}

/// Fixed sample candidates paired with their model keys.
pub fn sample_candidates() -> Vec<(String, RawCandidate)> {
    vec![
        sample(
            "bmw_e46_330",
            "BMW E46 330Ci Sport Manual - Full History",
            "£9,500",
            "Manchester",
            "2004",
            "89,000",
            "https://www.autotrader.co.uk/car-details/202602120001",
            SourceId::AutoTrader,
        ),
        sample(
            "lexus_is200",
            "Lexus IS200 Sport Manual - Immaculate",
            "£4,800",
            "Chester",
            "2003",
            "112,000",
            "https://www.autotrader.co.uk/car-details/202602120002",
            SourceId::AutoTrader,
        ),
        sample(
            "nissan_200sx",
            "Nissan 200SX S14a Kouki - Original SR20DET",
            "£18,500",
            "Preston",
            "1999",
            "95,000",
            "https://www.pistonheads.com/classifieds/used-cars/nissan/200sx/15234567",
            SourceId::PistonHeads,
        ),
        sample(
            "bmw_e36_328",
            "BMW E36 328i Sport Coupe - Manual",
            "£5,800",
            "Warrington",
            "1998",
            "145,000",
            "https://www.gumtree.com/p/cars-vans-motorbikes/bmw-e36-328i-sport/1487654321",
            SourceId::Gumtree,
        ),
        sample(
            "honda_civic_type_r",
            "Honda Civic Type R EP3 Championship White",
            "£8,800",
            "Bolton",
            "2005",
            "78,000",
            "https://www.autotrader.co.uk/car-details/202602120003",
            SourceId::AutoTrader,
        ),
        sample(
            "nissan_skyline_r33",
            "Nissan Skyline R33 GTS-T Type M - Fresh Import",
            "£24,000",
            "Blackpool",
            "1996",
            "78,000",
            "https://www.pistonheads.com/classifieds/used-cars/nissan/skyline/12345",
            SourceId::PistonHeads,
        ),
        sample(
            "mazda_rx7_fd",
            "Mazda RX-7 FD3S Twin Turbo - JDM Import",
            "£26,000",
            "Manchester",
            "1993",
            "65,000",
            "https://www.pistonheads.com/classifieds/used-cars/mazda/rx-7/12346",
            SourceId::PistonHeads,
        ),
        sample(
            "bmw_e36_m3",
            "BMW E36 M3 3.2 Evolution - Manual",
            "£16,500",
            "Lancaster",
            "1997",
            "98,000",
            "https://www.autotrader.co.uk/car-details/202602120005",
            SourceId::AutoTrader,
        ),
        sample(
            "nissan_350z",
            "Nissan 350Z GT Manual - Low Miles",
            "£10,500",
            "Wigan",
            "2007",
            "52,000",
            "https://www.autotrader.co.uk/car-details/202602120006",
            SourceId::AutoTrader,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_reference_cataloged_models() {
        let models = common::config::default_models();
        for (key, _) in sample_candidates() {
            assert!(
                models.iter().any(|m| m.key == key),
                "sample references unknown model {}",
                key
            );
        }
    }

    #[test]
    fn test_samples_have_parseable_prices_and_urls() {
        for (_, candidate) in sample_candidates() {
            assert!(extractors::parse_price(&candidate.price_text) > 0);
            assert!(candidate.url.starts_with("https://"));
        }
    }
}
