mod text_cleaning_tests;
