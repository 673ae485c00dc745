use super::{AzureConfig, Config};

impl Config {
    pub(crate) fn apply_env_overrides(&mut self) {
        self.apply_env_overrides_llm();
        self.apply_env_overrides_documents();
        self.apply_env_overrides_search();
        self.apply_env_overrides_gateway();
    }

    fn apply_env_overrides_llm(&mut self) {
        if let Ok(v) = std::env::var("DOCQA_LLM_PROVIDER") {
            if let Ok(kind) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.llm.provider = kind;
            } else {
                tracing::warn!("ignoring invalid DOCQA_LLM_PROVIDER value: {v}");
            }
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_BASE_URL") {
            self.llm.base_url = v;
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_MODEL") {
            self.llm.model = v;
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_EMBEDDING_MODEL") {
            self.llm.embedding_model = Some(v).filter(|m| !m.is_empty());
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_MAX_TOKENS")
            && let Ok(n) = v.parse::<u32>()
        {
            self.llm.max_tokens = n;
        }
        if let Ok(v) = std::env::var("DOCQA_LLM_TEMPERATURE")
            && let Ok(t) = v.parse::<f32>()
        {
            self.llm.temperature = Some(t);
        }
        if let Ok(v) = std::env::var("DOCQA_AZURE_ENDPOINT") {
            self.azure_mut().endpoint = v;
        }
        if let Ok(v) = std::env::var("DOCQA_AZURE_API_VERSION") {
            self.azure_mut().api_version = v;
        }
        if let Ok(v) = std::env::var("DOCQA_AZURE_CHAT_DEPLOYMENT") {
            self.azure_mut().chat_deployment = v;
        }
        if let Ok(v) = std::env::var("DOCQA_AZURE_EMBEDDING_DEPLOYMENT") {
            self.azure_mut().embedding_deployment = Some(v).filter(|d| !d.is_empty());
        }
    }

    fn apply_env_overrides_documents(&mut self) {
        if let Ok(v) = std::env::var("DOCQA_DOCUMENT_PATH") {
            self.documents.path = v.into();
        }
        if let Ok(v) = std::env::var("DOCQA_CHUNK_SIZE")
            && let Ok(n) = v.parse::<usize>()
        {
            self.documents.chunk_size = n;
        }
        if let Ok(v) = std::env::var("DOCQA_CHUNK_OVERLAP")
            && let Ok(n) = v.parse::<usize>()
        {
            self.documents.chunk_overlap = n;
        }
    }

    fn apply_env_overrides_search(&mut self) {
        if let Ok(v) = std::env::var("DOCQA_SEARCH_BACKEND") {
            if let Ok(backend) = serde_json::from_value(serde_json::Value::String(v.clone())) {
                self.search.backend = backend;
            } else {
                tracing::warn!("ignoring invalid DOCQA_SEARCH_BACKEND value: {v}");
            }
        }
        if let Ok(v) = std::env::var("DOCQA_QDRANT_URL") {
            self.search.qdrant_url = v;
        }
        if let Ok(v) = std::env::var("DOCQA_COLLECTION") {
            self.search.collection = v;
        }
        if let Ok(v) = std::env::var("DOCQA_TOP_K")
            && let Ok(k) = v.parse::<usize>()
        {
            self.search.top_k = k;
        }
    }

    fn apply_env_overrides_gateway(&mut self) {
        if let Ok(v) = std::env::var("DOCQA_GATEWAY_BIND") {
            self.gateway.bind = v;
        }
        if let Ok(v) = std::env::var("DOCQA_GATEWAY_PORT")
            && let Ok(port) = v.parse::<u16>()
        {
            self.gateway.port = port;
        }
        if let Ok(v) = std::env::var("DOCQA_GATEWAY_RATE_LIMIT")
            && let Ok(limit) = v.parse::<u32>()
        {
            self.gateway.rate_limit = limit;
        }
    }

    fn azure_mut(&mut self) -> &mut AzureConfig {
        self.llm.azure.get_or_insert_with(|| AzureConfig {
            api_version: docqa_llm::azure::DEFAULT_API_VERSION.into(),
            ..AzureConfig::default()
        })
    }
}
