mod composite_file_loader_test;
mod docx_adapter_test;
