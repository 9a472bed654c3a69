pub mod mock_llm_client;
