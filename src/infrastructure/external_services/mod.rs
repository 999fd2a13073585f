pub mod document_extractors;
pub mod flowise_client;
pub mod http_client;
pub mod inference_client;

pub use document_extractors::PdfExtractor;
pub use flowise_client::FlowiseClient;
pub use http_client::RetryingHttpClient;
pub use inference_client::InferenceEmbeddingProvider;
