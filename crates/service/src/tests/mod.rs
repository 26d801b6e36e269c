mod seaorm_store_tests;
