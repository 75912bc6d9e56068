//! Turning an image into the node override for a picture-input node

use std::path::PathBuf;

use super::introspect::PictureInputNode;
use super::rules::PictureInputKind;
use crate::client::{Client, Transport};
use crate::error::{Result, SdkError};
use crate::files::{download_from_url, encode_file_base64, TempFile};
use crate::types::NodeInfo;

/// Where an input image comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Url(String),
}

impl<T: Transport> Client<T> {
    /// Builds the [`NodeInfo`] feeding `source` into `node`.
    ///
    /// Base64 nodes get the encoded image bytes, file nodes get the name
    /// returned by the upload endpoint and URL nodes get the URL itself.
    pub async fn prepare_picture_input(
        &self,
        node: &PictureInputNode,
        source: &ImageSource,
    ) -> Result<NodeInfo> {
        let value = match (node.kind, source) {
            (PictureInputKind::Base64, ImageSource::Path(path)) => encode_file_base64(path).await?,
            (PictureInputKind::Base64, ImageSource::Url(url)) => {
                let local = TempFile::new(
                    download_from_url(url, &self.config().download_dir, self.config().effective_timeout())
                        .await?,
                );
                encode_file_base64(local.path()).await?
            }
            (PictureInputKind::File, ImageSource::Path(path)) => {
                self.upload_resource(path).await?.file_name
            }
            (PictureInputKind::File, ImageSource::Url(url)) => {
                self.upload_resource_from_url(url).await?.file_name
            }
            (PictureInputKind::Url, ImageSource::Url(url)) => url.clone(),
            (PictureInputKind::Url, ImageSource::Path(path)) => {
                return Err(SdkError::InvalidArgument(format!(
                    "node {} ({}) loads from a URL, got local path {}",
                    node.node_id,
                    node.class_type,
                    path.display()
                )));
            }
        };
        Ok(NodeInfo::new(node.node_id.clone(), node.field_name.clone(), value))
    }
}
