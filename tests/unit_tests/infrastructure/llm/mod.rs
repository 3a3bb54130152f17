mod beam_search_test;
mod model_factory_test;
