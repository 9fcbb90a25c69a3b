//! Page size and OCR resolution reconciliation.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result, Warning};
use crate::model::{BBox, ImageInfo, ResolvedGeometry};
use crate::parser::{MarkupNode, MarkupTree};

/// OCR resolution assumed when the image carries no DPI of its own.
pub const DEFAULT_OCR_DPI: f64 = 300.0;

/// Image resolution assumed when nothing else is known.
pub const FALLBACK_IMAGE_DPI: f64 = 96.0;

/// hOCR class of the element spanning the whole recognized page.
pub const PAGE_REGION_CLASS: &str = "ocr_page";

/// Resolution assumptions used when metadata is missing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolutionPolicy {
    /// Resolution the OCR is assumed to have run at (default 300)
    pub default_ocr_dpi: f64,

    /// Resolution the image is assumed to have when nothing is known (default 96)
    pub fallback_image_dpi: f64,

    /// Class of the page region element (default `ocr_page`)
    pub page_region_class: String,
}

impl ResolutionPolicy {
    /// Create a policy with the standard defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the assumed OCR resolution.
    pub fn with_default_ocr_dpi(mut self, dpi: f64) -> Self {
        self.default_ocr_dpi = dpi;
        self
    }

    /// Set the last-resort image resolution.
    pub fn with_fallback_image_dpi(mut self, dpi: f64) -> Self {
        self.fallback_image_dpi = dpi;
        self
    }

    /// Set the page region class.
    pub fn with_page_region_class(mut self, class: impl Into<String>) -> Self {
        self.page_region_class = class.into();
        self
    }

    /// Reject non-positive or non-finite resolutions.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default OCR DPI", self.default_ocr_dpi),
            ("fallback image DPI", self.fallback_image_dpi),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidOption(format!(
                    "{} must be positive, got {}",
                    name, value
                )));
            }
        }
        Ok(())
    }
}

impl Default for ResolutionPolicy {
    fn default() -> Self {
        Self {
            default_ocr_dpi: DEFAULT_OCR_DPI,
            fallback_image_dpi: FALLBACK_IMAGE_DPI,
            page_region_class: PAGE_REGION_CLASS.to_string(),
        }
    }
}

/// Where the physical page size came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PageSizeSource {
    /// The image's own DPI metadata
    ImageMetadata,
    /// The OCR page region at the default OCR resolution
    OcrPageRegion,
    /// The last-resort image resolution
    Fallback,
}

/// Outcome of reconciling one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    /// Page size and OCR resolution
    pub geometry: ResolvedGeometry,

    /// Provenance of the page size
    pub page_size_source: PageSizeSource,

    /// The page region box the OCR resolution was derived from
    pub page_region: Option<BBox>,

    /// Diagnostics raised while resolving
    pub warnings: Vec<Warning>,
}

/// Computes [`ResolvedGeometry`] from image metadata and the hOCR page region.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    policy: ResolutionPolicy,
}

impl Resolver {
    /// Create a resolver with the given policy.
    pub fn new(policy: ResolutionPolicy) -> Self {
        Self { policy }
    }

    /// Establish page size and OCR resolution for one page.
    ///
    /// Image DPI decides the page size when present. The first OCR page
    /// region always decides the OCR resolution, and decides the page size
    /// too when the image has no DPI. Later page regions are ignored.
    ///
    /// # Arguments
    ///
    /// * `image` - Pixel size and, if the file carried one, its DPI
    /// * `ocr` - Parsed hOCR; `None` keeps the default OCR resolution
    ///
    /// # Errors
    ///
    /// `Error::Geometry` when the result is not positive and finite, e.g. a
    /// zero-pixel image.
    pub fn resolve<T: MarkupTree>(&self, image: &ImageInfo, ocr: Option<&T>) -> Result<Resolution> {
        let mut warnings = Vec::new();
        let pixel_width = f64::from(image.width);
        let pixel_height = f64::from(image.height);

        let mut page_size = image
            .usable_dpi()
            .map(|(dpi_x, dpi_y)| (pixel_width / dpi_x, pixel_height / dpi_y));
        let mut source = PageSizeSource::ImageMetadata;
        if page_size.is_none() {
            if let Some(dpi) = image.dpi {
                log::debug!("Ignoring unusable image DPI {:?}", dpi);
            }
        }

        let default_dpi = self.policy.default_ocr_dpi;
        let mut ocr_dpi = (default_dpi, default_dpi);
        let mut page_region = None;

        if let Some(doc) = ocr {
            let class = self.policy.page_region_class.as_str();
            let first_region = doc
                .elements_by_local_name("div")
                .into_iter()
                .find(|div| div.has_class(class));

            if let Some(region) = first_region {
                match region.bbox() {
                    Ok(bbox) if !bbox.is_empty() => {
                        let ocr_width = f64::from(bbox.width());
                        let ocr_height = f64::from(bbox.height());
                        let (page_width, page_height) = *page_size.get_or_insert_with(|| {
                            source = PageSizeSource::OcrPageRegion;
                            (ocr_width / default_dpi, ocr_height / default_dpi)
                        });
                        ocr_dpi = (ocr_width / page_width, ocr_height / page_height);
                        page_region = Some(bbox);
                    }
                    Ok(_) => warnings.push(Warning::MalformedPageRegion {
                        class: class.to_string(),
                        reason: "page region has zero extent".to_string(),
                    }),
                    Err(issue) => warnings.push(Warning::MalformedPageRegion {
                        class: class.to_string(),
                        reason: issue.to_string(),
                    }),
                }
            }

            if page_region.is_none() {
                warnings.push(Warning::MissingPageRegion {
                    assumed_dpi: default_dpi,
                });
            }
        }

        let (page_width, page_height) = match page_size {
            Some(size) => size,
            None => {
                source = PageSizeSource::Fallback;
                let fallback = self.policy.fallback_image_dpi;
                warnings.push(Warning::UnresolvedGeometry {
                    source_name: image.source_name.clone(),
                    assumed_dpi: fallback,
                });
                (pixel_width / fallback, pixel_height / fallback)
            }
        };

        let geometry = ResolvedGeometry::new(page_width, page_height, ocr_dpi.0, ocr_dpi.1);
        if !geometry.is_valid() {
            return Err(Error::Geometry(format!(
                "{}x{} px image resolved to {:?}",
                image.width, image.height, geometry
            )));
        }

        for warning in &warnings {
            log::warn!("{}", warning);
        }
        log::debug!("Resolved geometry {:?} from {:?}", geometry, source);

        Ok(Resolution {
            geometry,
            page_size_source: source,
            page_region,
            warnings,
        })
    }
}
