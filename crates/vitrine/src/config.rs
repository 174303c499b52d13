//! Page configuration.
//!
//! Every tunable constant of the page behaviour lives here with the values
//! the landing page ships with. The whole struct is `serde`-friendly so a
//! page can override parts of it from a JSON block.

use crate::observer::{ObserverOptions, RootMargin};
use crate::result::{VitrineError, VitrineResult};
use serde::{Deserialize, Serialize};

/// Selectors used to collect the page elements at startup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Selectors {
    /// Fixed site header (`#header`)
    pub header: String,
    /// Hamburger button (`#hamburger`)
    pub hamburger: String,
    /// Mobile overlay menu (`#mobileMenu`)
    pub mobile_menu: String,
    /// Links inside the mobile menu, relative to it
    pub mobile_menu_links: String,
    /// In-page anchor links
    pub anchors: String,
    /// Hero image (`#heroImg`)
    pub hero_image: String,
    /// Elements revealed on scroll
    pub reveal: String,
    /// Counter containers
    pub stat: String,
    /// Number element inside a counter container
    pub stat_number: String,
    /// Accordion items
    pub accordion_item: String,
    /// Trigger inside an accordion item
    pub accordion_trigger: String,
    /// Image swapped by the accordion (`#treatmentsImg`)
    pub accordion_image: String,
    /// Carousel root (`#carousel`)
    pub carousel: String,
    /// Carousel slides
    pub slide: String,
    /// Carousel indicator dots
    pub indicator: String,
    /// Previous button (`#prevBtn`)
    pub prev_button: String,
    /// Next button (`#nextBtn`)
    pub next_button: String,
    /// Looping marquee track
    pub marquee_track: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            header: "header".to_string(),
            hamburger: "hamburger".to_string(),
            mobile_menu: "mobileMenu".to_string(),
            mobile_menu_links: "a".to_string(),
            anchors: r##"a[href^="#"]"##.to_string(),
            hero_image: "heroImg".to_string(),
            reveal: ".fade-in".to_string(),
            stat: ".stat".to_string(),
            stat_number: ".stat__n".to_string(),
            accordion_item: ".accordion__item".to_string(),
            accordion_trigger: ".accordion__trigger".to_string(),
            accordion_image: "treatmentsImg".to_string(),
            carousel: "carousel".to_string(),
            slide: ".testimonial".to_string(),
            indicator: ".tc-dot".to_string(),
            prev_button: "prevBtn".to_string(),
            next_button: "nextBtn".to_string(),
            marquee_track: ".marquee-track".to_string(),
        }
    }
}

/// Presentation classes toggled by the controllers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Header past the scroll threshold
    pub scrolled: String,
    /// Revealed element
    pub visible: String,
    /// Open accordion item, active slide, active indicator
    pub active: String,
    /// Open mobile menu and hamburger
    pub open: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            scrolled: "scrolled".to_string(),
            visible: "visible".to_string(),
            active: "active".to_string(),
            open: "open".to_string(),
        }
    }
}

/// Page behaviour configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    /// Scroll offset past which the header is "scrolled"
    pub header_scrolled_after_px: f64,
    /// Hero offset per pixel scrolled
    pub parallax_factor: f64,
    /// Height of the fixed header kept clear when following anchors
    pub anchor_offset_px: f64,
    /// Reveal observer options
    pub reveal_observer: ObserverOptions,
    /// Counter observer options
    pub counter_observer: ObserverOptions,
    /// Counter animation length
    pub counter_duration_ms: u32,
    /// Delay between fading the accordion image out and swapping it
    pub accordion_swap_delay_ms: u32,
    /// Carousel autoplay period
    pub autoplay_interval_ms: u32,
    /// Presentation classes
    pub classes: ClassNames,
    /// Element selectors
    pub selectors: Selectors,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            header_scrolled_after_px: 60.0,
            parallax_factor: 0.25,
            anchor_offset_px: 80.0,
            reveal_observer: ObserverOptions::with_threshold(0.1)
                .with_root_margin(RootMargin::bottom(-40.0)),
            counter_observer: ObserverOptions::with_threshold(0.4),
            counter_duration_ms: 1800,
            accordion_swap_delay_ms: 350,
            autoplay_interval_ms: 5000,
            classes: ClassNames::default(),
            selectors: Selectors::default(),
        }
    }
}

impl PageConfig {
    /// Create a new builder
    #[must_use]
    pub fn builder() -> PageConfigBuilder {
        PageConfigBuilder::default()
    }

    /// Parse from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> VitrineResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> VitrineResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check value ranges
    pub fn validate(&self) -> VitrineResult<()> {
        for (field, opts) in [
            ("reveal_observer.threshold", &self.reveal_observer),
            ("counter_observer.threshold", &self.counter_observer),
        ] {
            if !(0.0..=1.0).contains(&opts.threshold) {
                return Err(VitrineError::invalid_setting(
                    field,
                    format!("{} is outside [0, 1]", opts.threshold),
                ));
            }
        }
        for (field, value) in [
            ("header_scrolled_after_px", self.header_scrolled_after_px),
            ("parallax_factor", self.parallax_factor),
            ("anchor_offset_px", self.anchor_offset_px),
        ] {
            if !value.is_finite() {
                return Err(VitrineError::invalid_setting(field, "must be finite"));
            }
        }
        if self.counter_duration_ms == 0 {
            return Err(VitrineError::invalid_setting(
                "counter_duration_ms",
                "must be positive",
            ));
        }
        if self.autoplay_interval_ms == 0 {
            return Err(VitrineError::invalid_setting(
                "autoplay_interval_ms",
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// Builder for [`PageConfig`]
#[derive(Debug, Clone, Default)]
pub struct PageConfigBuilder {
    config: PageConfig,
}

impl PageConfigBuilder {
    /// Set the header threshold
    #[must_use]
    pub fn header_scrolled_after_px(mut self, px: f64) -> Self {
        self.config.header_scrolled_after_px = px;
        self
    }

    /// Set the parallax factor
    #[must_use]
    pub fn parallax_factor(mut self, factor: f64) -> Self {
        self.config.parallax_factor = factor;
        self
    }

    /// Set the anchor offset
    #[must_use]
    pub fn anchor_offset_px(mut self, px: f64) -> Self {
        self.config.anchor_offset_px = px;
        self
    }

    /// Set the reveal observer options
    #[must_use]
    pub fn reveal_observer(mut self, options: ObserverOptions) -> Self {
        self.config.reveal_observer = options;
        self
    }

    /// Set the counter observer options
    #[must_use]
    pub fn counter_observer(mut self, options: ObserverOptions) -> Self {
        self.config.counter_observer = options;
        self
    }

    /// Set the counter duration
    #[must_use]
    pub fn counter_duration_ms(mut self, ms: u32) -> Self {
        self.config.counter_duration_ms = ms;
        self
    }

    /// Set the accordion swap delay
    #[must_use]
    pub fn accordion_swap_delay_ms(mut self, ms: u32) -> Self {
        self.config.accordion_swap_delay_ms = ms;
        self
    }

    /// Set the autoplay period
    #[must_use]
    pub fn autoplay_interval_ms(mut self, ms: u32) -> Self {
        self.config.autoplay_interval_ms = ms;
        self
    }

    /// Set the class names
    #[must_use]
    pub fn classes(mut self, classes: ClassNames) -> Self {
        self.config.classes = classes;
        self
    }

    /// Set the selectors
    #[must_use]
    pub fn selectors(mut self, selectors: Selectors) -> Self {
        self.config.selectors = selectors;
        self
    }

    /// Build and validate
    pub fn build(self) -> VitrineResult<PageConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_page() {
        let c = PageConfig::default();
        assert_eq!(c.header_scrolled_after_px, 60.0);
        assert_eq!(c.parallax_factor, 0.25);
        assert_eq!(c.anchor_offset_px, 80.0);
        assert_eq!(c.reveal_observer.threshold, 0.1);
        assert_eq!(c.reveal_observer.root_margin.bottom, -40.0);
        assert_eq!(c.counter_observer.threshold, 0.4);
        assert_eq!(c.counter_duration_ms, 1800);
        assert_eq!(c.accordion_swap_delay_ms, 350);
        assert_eq!(c.autoplay_interval_ms, 5000);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_default_selectors() {
        let s = Selectors::default();
        assert_eq!(s.reveal, ".fade-in");
        assert_eq!(s.anchors, r##"a[href^="#"]"##);
        assert_eq!(s.carousel, "carousel");
    }

    #[test]
    fn test_builder() {
        let c = PageConfig::builder()
            .autoplay_interval_ms(3000)
            .parallax_factor(0.5)
            .build()
            .unwrap();
        assert_eq!(c.autoplay_interval_ms, 3000);
        assert_eq!(c.parallax_factor, 0.5);
        assert_eq!(c.counter_duration_ms, 1800);
    }

    #[test]
    fn test_builder_rejects_zero_interval() {
        let err = PageConfig::builder().autoplay_interval_ms(0).build().unwrap_err();
        assert!(matches!(
            err,
            VitrineError::InvalidSetting {
                field: "autoplay_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_from_json_partial_override() {
        let c = PageConfig::from_json(r#"{ "anchor_offset_px": 96, "classes": { "visible": "shown" } }"#)
            .unwrap();
        assert_eq!(c.anchor_offset_px, 96.0);
        assert_eq!(c.classes.visible, "shown");
        assert_eq!(c.classes.active, "active");
        assert_eq!(c.header_scrolled_after_px, 60.0);
    }

    #[test]
    fn test_from_json_rejects_bad_threshold() {
        let err = PageConfig::from_json(
            r#"{ "counter_observer": { "threshold": 1.5, "root_margin": { "top": 0, "right": 0, "bottom": 0, "left": 0 } } }"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("counter_observer.threshold"));
    }

    #[test]
    fn test_from_json_syntax_error() {
        assert!(matches!(
            PageConfig::from_json("{"),
            Err(VitrineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_json_round_trip_keeps_defaults() {
        let json = PageConfig::default().to_json().unwrap();
        assert_eq!(PageConfig::from_json(&json).unwrap(), PageConfig::default());
    }
}
