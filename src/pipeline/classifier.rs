use image::DynamicImage;

/// Decides whether an image shows a plant before it is scored.
///
/// Injected into a `Pipeline` by the caller so the scoring itself stays
/// independent of how (or whether) plants are recognized.
pub trait PlantClassifier: Send + Sync {
    fn is_plant(&self, image: &DynamicImage) -> bool;
}

/// Accepts every image.  The default classifier.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PlantClassifier for AcceptAll {
    fn is_plant(&self, _image: &DynamicImage) -> bool {
        true
    }
}

impl<F> PlantClassifier for F
where
    F: Fn(&DynamicImage) -> bool + Send + Sync,
{
    fn is_plant(&self, image: &DynamicImage) -> bool {
        self(image)
    }
}
