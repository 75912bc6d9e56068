//! Static table of node classes that take a picture as input

use serde::Serialize;
use std::fmt;

/// How a picture-input node receives its image
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PictureInputKind {
    /// Image bytes as a base64 string
    Base64,
    /// A file previously uploaded to the service
    File,
    /// A remote URL fetched by the node
    Url,
}

impl PictureInputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PictureInputKind::Base64 => "base64",
            PictureInputKind::File => "file",
            PictureInputKind::Url => "url",
        }
    }
}

impl fmt::Display for PictureInputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which input field of a node class carries the picture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PictureInputRule {
    pub class_type: &'static str,
    pub field_name: &'static str,
    pub kind: PictureInputKind,
}

const fn rule(class_type: &'static str, field_name: &'static str, kind: PictureInputKind) -> PictureInputRule {
    PictureInputRule {
        class_type,
        field_name,
        kind,
    }
}

use PictureInputKind::{Base64, File, Url};

/// Known picture-input node classes
pub static PICTURE_INPUT_RULES: &[PictureInputRule] = &[
    rule("LoadImageFromBase64", "data", Base64),
    rule("easy loadImageBase64", "base64_data", Base64),
    rule("LoadImageHDR", "image", File),
    rule("LoadImageMask", "image", File),
    rule("LoadHDRImage", "image", File),
    rule("LoadPILImage", "image", File),
    rule("LoadImageOutput", "image", File),
    rule("LoadImage", "image", File),
    rule("LoadImageReturnFilename", "image", File),
    rule("LoadImageMW", "image", File),
    rule("ZML_LoadImage", "图像", File),
    rule("MuyeLoadImage", "image", File),
    rule("Load image with metadata [Crystools]", "image", File),
    rule("LoadImage //Inspire", "image", File),
    rule("LoadImageFromUrl", "image", Url),
    rule("LoadImageAsMaskFromUrl", "image", Url),
    rule("Load Image From Url (mtb)", "url", Url),
    rule("LoadImageFromURL", "url", Url),
    rule("LoadImagesFromURL", "url", Url),
    rule("Light-Tool: LoadImageFromURL", "url", Url),
];

/// Looks up the picture-input rule for a node class
pub fn picture_input_rule(class_type: &str) -> Option<&'static PictureInputRule> {
    PICTURE_INPUT_RULES.iter().find(|r| r.class_type == class_type)
}
